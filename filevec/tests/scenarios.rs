//! End-to-end scenarios: fill, traverse, persist and reopen

use filevec::{ErrorCategory, FileElement, FileVec, NonTrivial};
use std::fs;
use tempfile::tempdir;

const PAGE: usize = 4096;

#[derive(Debug, Clone, PartialEq)]
struct IntObj {
    x: i32,
}

unsafe impl FileElement for IntObj {
    type Policy = NonTrivial;
}

#[test]
fn test_page_sized_fill_and_traversal() {
    let dir = tempdir().unwrap();
    let path1 = dir.path().join("test1");
    let path2 = dir.path().join("test2");

    let mut vec1: FileVec<i32> = FileVec::open(&path1).unwrap();
    vec1.clear();
    assert_eq!(vec1.len(), 0);

    for i in 0..PAGE as i32 {
        vec1.push(i).unwrap();
        assert_eq!(*vec1.at(i as usize).unwrap(), i);
    }
    assert_eq!(vec1.len(), PAGE);
    assert!(vec1.iter().enumerate().all(|(i, &v)| v == i as i32));

    let mut cursor = vec1.cursor_mut();
    while let Some(value) = cursor.get_mut() {
        *value = 1;
        assert_eq!(cursor.get(), Some(&1));
        cursor.move_next();
    }
    assert_eq!(vec1.len(), PAGE);
    assert!(vec1.rcursor().iter().all(|&v| v == 1));

    for _ in 0..PAGE {
        vec1.push(2).unwrap();
    }
    assert_eq!(vec1.len(), 2 * PAGE);

    let err = vec1.at(2 * PAGE).unwrap_err();
    assert!(err.is_out_of_range());
    assert_eq!(err.category(), ErrorCategory::Bounds);
    assert!(vec1.at(usize::MAX).unwrap_err().is_out_of_range());

    let mut vec2: FileVec<i32> = FileVec::open(&path2).unwrap();
    vec2.assign(&vec1).unwrap();
    assert_eq!(vec2, vec1);

    vec1.close().unwrap();
    vec2.close().unwrap();

    let expected_bytes = (2 * PAGE * std::mem::size_of::<i32>()) as u64;
    assert_eq!(fs::metadata(&path1).unwrap().len(), expected_bytes);
    assert_eq!(fs::metadata(&path2).unwrap().len(), expected_bytes);

    let reopened: FileVec<i32> = FileVec::open(&path2).unwrap();
    assert_eq!(reopened.len(), 2 * PAGE);
    assert!(reopened[..PAGE].iter().all(|&v| v == 1));
    assert!(reopened[PAGE..].iter().all(|&v| v == 2));
}

#[test]
fn test_non_trivial_copy_and_construction() {
    let dir = tempdir().unwrap();

    let mut vec3 = FileVec::open(dir.path().join("test3")).unwrap();
    let obj = IntObj { x: 3 };
    for _ in 0..PAGE {
        vec3.push(obj.clone()).unwrap();
    }

    let mut vec4: FileVec<IntObj> = FileVec::open(dir.path().join("test4")).unwrap();
    vec4.assign(&vec3).unwrap();
    assert_eq!(vec3, vec4);

    let end = vec4.len();
    vec4.insert(end, IntObj { x: 999 }).unwrap();
    assert_ne!(vec3, vec4);

    let vec5 = FileVec::from_other(dir.path().join("test5"), &vec4).unwrap();
    assert_eq!(vec5, vec4);
    assert_eq!(vec5.len(), PAGE + 1);
    assert_eq!(vec5.back(), Some(&IntObj { x: 999 }));
    drop(vec5);

    vec3.close().unwrap();
    vec4.close().unwrap();

    let reopened: FileVec<IntObj> = FileVec::open(dir.path().join("test5")).unwrap();
    assert_eq!(reopened.len(), PAGE + 1);
    assert_eq!(reopened.front(), Some(&IntObj { x: 3 }));
    assert_eq!(reopened.back(), Some(&IntObj { x: 999 }));
}

#[test]
fn test_persisted_lists_and_front_insertion() {
    let dir = tempdir().unwrap();
    let path6 = dir.path().join("test6");

    let mut vec6: FileVec<i32> = FileVec::open(&path6).unwrap();
    vec6.assign(&[1, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap();
    vec6.close().unwrap();

    let vec7 =
        FileVec::from_slice(dir.path().join("test7"), &[9, 8, 7, 6, 5, 4, 3, 2, 1, 0]).unwrap();
    drop(vec7);
    let vec7: FileVec<i32> = FileVec::open(dir.path().join("test7")).unwrap();
    assert_eq!(vec7, [9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);

    let mut a = FileVec::from_other(
        dir.path().join("test8"),
        &FileVec::<i32>::open(&path6).unwrap(),
    )
    .unwrap();
    assert_eq!(a, [1, 2, 3, 4, 5, 6, 7, 8, 9]);

    assert_eq!(a.insert(0, 999).unwrap(), 0);
    assert_eq!(a.len(), 10);
    a.insert_n(0, 2, &999).unwrap();
    assert_eq!(a.len(), 12);

    // Gap larger than the whole live range
    let count = a.len() + 2;
    a.insert_n(0, count, &999).unwrap();
    assert_eq!(a.len(), 26);
    assert!(a[..17].iter().all(|&v| v == 999));
    assert_eq!(a[17..], [1, 2, 3, 4, 5, 6, 7, 8, 9]);

    // The source file is untouched by copying out of it
    let vec6: FileVec<i32> = FileVec::open(&path6).unwrap();
    assert_eq!(vec6.len(), 9);
}

#[test]
fn test_insert_erase_swap_round() {
    let dir = tempdir().unwrap();
    let mut a = FileVec::from_slice(dir.path().join("a"), &[9, 8, 7, 6, 5, 4, 3, 2, 1, 0]).unwrap();
    let mut b: FileVec<i32> = FileVec::open(dir.path().join("b")).unwrap();

    a.insert_slice(5, &[100, 101]).unwrap();
    assert_eq!(a, [9, 8, 7, 6, 5, 100, 101, 4, 3, 2, 1, 0]);

    assert_eq!(a.erase(0..3).unwrap(), 0);
    assert_eq!(a, [6, 5, 100, 101, 4, 3, 2, 1, 0]);

    b.extend_from_slice(&[1, 2]).unwrap();
    a.swap_contents(&mut b).unwrap();
    assert_eq!(a, [1, 2]);
    assert_eq!(b, [6, 5, 100, 101, 4, 3, 2, 1, 0]);

    a.close().unwrap();
    b.close().unwrap();

    let a: FileVec<i32> = FileVec::open(dir.path().join("a")).unwrap();
    let b: FileVec<i32> = FileVec::open(dir.path().join("b")).unwrap();
    assert_eq!(a, [1, 2]);
    assert_eq!(b.len(), 9);
}

#[test]
fn test_closed_vector_rejects_storage_operations() {
    let dir = tempdir().unwrap();
    let mut vec = FileVec::from_slice(dir.path().join("closed"), &[1u16, 2, 3]).unwrap();
    vec.close().unwrap();

    assert!(!vec.is_open());
    assert!(vec.is_empty());
    assert_eq!(vec.capacity(), 0);
    assert_eq!(vec.pop(), None);
    vec.clear();

    let err = vec.push(4).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Usage);
    assert!(vec.reserve(1).is_err());
    assert!(vec.at(0).unwrap_err().is_out_of_range());

    // Closing again is a no-op
    vec.close().unwrap();
}

#[test]
fn test_append_insert_front_erase_then_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("front");

    let mut vec: FileVec<i32> = FileVec::open(&path).unwrap();
    for i in 0..PAGE as i32 {
        vec.push(i).unwrap();
    }

    assert_eq!(vec.insert(0, 999).unwrap(), 0);
    assert_eq!(vec.len(), PAGE + 1);
    assert_eq!(vec[0], 999);
    assert_eq!(vec[1], 0);
    assert_eq!(vec[PAGE], PAGE as i32 - 1);

    assert_eq!(vec.erase(0..1).unwrap(), 0);
    assert_eq!(vec.len(), PAGE);
    assert!(vec.iter().enumerate().all(|(i, &v)| v == i as i32));

    vec.close().unwrap();
    assert_eq!(
        fs::metadata(&path).unwrap().len(),
        (PAGE * std::mem::size_of::<i32>()) as u64
    );

    let reopened: FileVec<i32> = FileVec::open(&path).unwrap();
    assert_eq!(reopened.len(), PAGE);
    assert!(reopened.iter().enumerate().all(|(i, &v)| v == i as i32));
}

#[cfg(target_pointer_width = "64")]
#[test]
fn test_failed_growth_leaves_vector_unchanged() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rollback");

    let mut vec = FileVec::from_slice(&path, &[1i32, 2, 3]).unwrap();
    let capacity = vec.capacity();
    let generation = vec.generation();
    let file_len = fs::metadata(&path).unwrap().len();

    // 2^56 bytes: beyond what the file system or the address space allows
    let err = vec.reserve(1usize << 54).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Mapping);

    assert_eq!(vec.capacity(), capacity);
    assert_eq!(vec.generation(), generation);
    assert_eq!(fs::metadata(&path).unwrap().len(), file_len);
    assert_eq!(vec, [1, 2, 3]);

    // Still usable, including growth that does fit
    vec.push(4).unwrap();
    vec.reserve(100).unwrap();
    assert_eq!(vec, [1, 2, 3, 4]);

    vec.close().unwrap();
    let reopened: FileVec<i32> = FileVec::open(&path).unwrap();
    assert_eq!(reopened, [1, 2, 3, 4]);
}
