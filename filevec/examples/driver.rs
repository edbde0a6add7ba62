use clap::{Parser, Subcommand};
use filevec::{FileElement, FileVec, NonTrivial, VecConfig};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(about = "FileVec driver - exercise file-backed vectors end to end")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay the fill, copy and insertion scenarios in a directory
    Scenarios {
        /// Directory for the backing files
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Elements per fill pass
        #[arg(long, default_value_t = 4096)]
        count: usize,

        /// Slots established for empty files
        #[arg(long, default_value_t = 1)]
        min_capacity: usize,
    },
    /// Show the length and contents summary of an i32 vector file
    Info {
        /// Backing file
        path: PathBuf,
    },
    /// Print the default configuration
    Config,
}

#[derive(Debug, Clone, PartialEq)]
struct IntObj {
    x: i32,
}

unsafe impl FileElement for IntObj {
    type Policy = NonTrivial;
}

type DriverResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() -> DriverResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let start_time = std::time::Instant::now();

    match &cli.command {
        Commands::Scenarios {
            dir,
            count,
            min_capacity,
        } => {
            let config = VecConfig::default().with_min_capacity(*min_capacity);
            let failures = run_scenarios(dir, *count, &config)?;
            if failures > 0 {
                return Err(format!("{failures} scenario(s) failed").into());
            }
        }
        Commands::Info { path } => {
            let vec: FileVec<i32> = FileVec::open(path)?;
            println!("{vec:?}");
            println!("front: {:?}", vec.front());
            println!("back: {:?}", vec.back());
        }
        Commands::Config => print_config()?,
    }

    let elapsed = start_time.elapsed();
    println!("Completed in {elapsed:.2?}");

    Ok(())
}

#[cfg(feature = "serde")]
fn print_config() -> DriverResult<()> {
    println!("{}", VecConfig::default().to_json()?);
    Ok(())
}

#[cfg(not(feature = "serde"))]
fn print_config() -> DriverResult<()> {
    println!("{:?}", VecConfig::default());
    Ok(())
}

fn report(name: &str, passed: bool) -> usize {
    println!("{name:<24} {}", if passed { "pass" } else { "FAIL" });
    usize::from(!passed)
}

fn run_scenarios(dir: &Path, count: usize, config: &VecConfig) -> DriverResult<usize> {
    let mut failures = 0;
    failures += report("fill and traverse", fill_and_traverse(dir, count, config)?);
    failures += report("non-trivial copies", non_trivial_copies(dir, count, config)?);
    failures += report("front insertion", front_insertion(dir, config)?);
    Ok(failures)
}

fn fill_and_traverse(dir: &Path, count: usize, config: &VecConfig) -> DriverResult<bool> {
    let mut vec1: FileVec<i32> = FileVec::open_with_config(dir.join("test1"), config.clone())?;
    vec1.clear();

    let mut passed = true;
    for i in 0..count as i32 {
        vec1.push(i)?;
        passed &= *vec1.at(i as usize)? == i;
    }

    for value in vec1.iter_mut() {
        *value = 1;
    }
    passed &= vec1.rcursor().iter().all(|&v| v == 1);

    for _ in 0..count {
        vec1.push(2)?;
    }
    passed &= vec1.len() == 2 * count;
    passed &= vec1.at(2 * count).is_err_and(|e| e.is_out_of_range());

    let mut vec2: FileVec<i32> = FileVec::open_with_config(dir.join("test2"), config.clone())?;
    vec2.assign(&vec1)?;
    passed &= vec2 == vec1;

    info!(
        len = vec1.len(),
        capacity = vec1.capacity(),
        remaps = vec1.generation(),
        "filled test1"
    );
    vec1.close()?;
    vec2.close()?;
    Ok(passed)
}

fn non_trivial_copies(dir: &Path, count: usize, config: &VecConfig) -> DriverResult<bool> {
    let obj = IntObj { x: 3 };
    let mut vec3 = FileVec::open_with_config(dir.join("test3"), config.clone())?;
    vec3.resize(count, &obj)?;

    let mut vec4: FileVec<IntObj> = FileVec::open_with_config(dir.join("test4"), config.clone())?;
    vec4.assign(&vec3)?;
    let mut passed = vec3 == vec4;

    let end = vec4.len();
    vec4.insert(end, IntObj { x: 999 })?;
    let mut vec5: FileVec<IntObj> = FileVec::open_with_config(dir.join("test5"), config.clone())?;
    vec5.assign(&vec4)?;
    passed &= vec5 == vec4 && vec5.len() == count + 1;

    vec3.close()?;
    vec4.close()?;
    Ok(passed)
}

fn front_insertion(dir: &Path, config: &VecConfig) -> DriverResult<bool> {
    let mut vec6: FileVec<i32> = FileVec::open_with_config(dir.join("test6"), config.clone())?;
    vec6.assign(&[1, 2, 3, 4, 5, 6, 7, 8, 9])?;
    vec6.close()?;

    let mut vec7: FileVec<i32> = FileVec::open_with_config(dir.join("test7"), config.clone())?;
    vec7.assign(&[9, 8, 7, 6, 5, 4, 3, 2, 1, 0])?;
    vec7.close()?;

    let vec6: FileVec<i32> = FileVec::open_with_config(dir.join("test6"), config.clone())?;
    let mut a: FileVec<i32> = FileVec::open_with_config(dir.join("test8"), config.clone())?;
    a.assign(&vec6)?;
    a.insert(0, 999)?;
    a.insert_n(0, 2, &999)?;
    let count = a.len() + 2;
    a.insert_n(0, count, &999)?;

    Ok(a.len() == 26 && a[17..] == [1, 2, 3, 4, 5, 6, 7, 8, 9])
}
