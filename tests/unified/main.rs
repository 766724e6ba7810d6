#![cfg_attr(feature = "allocator_api", feature(allocator_api))]

mod tracking;

use bumpalo::Bump;
use digitlist::AllocError;
use digitlist::IntList;
use digitlist::SumError;
use expect_test::expect;
use tracking::Tracking;

fn fill<'a>(t: &'a Tracking, values: &[i32]) -> IntList<&'a Tracking> {
  let mut x = IntList::new_in(t);
  for &v in values {
    x.insert_to_tail(v);
  }
  x
}

#[test]
fn test_drop_releases_each_node_once() {
  for n in [0, 1, 2, 100] {
    let t = Tracking::new();
    let mut x = IntList::new_in(&t);
    for i in 0 .. n {
      x.insert_to_head(i);
    }
    assert!(t.allocs() == n as usize);
    assert!(t.frees() == 0);
    drop(x);
    assert!(t.allocs() == n as usize);
    assert!(t.frees() == n as usize);
  }
}

#[test]
fn test_clear_releases_every_node() {
  let t = Tracking::new();
  let mut x = fill(&t, &[1, 2, 3]);
  x.clear();
  assert!(t.frees() == 3);
  x.insert_to_tail(4);
  drop(x);
  assert!(t.allocs() == 4);
  assert!(t.frees() == 4);
}

#[test]
fn test_clone_allocates_fresh_nodes() {
  let t = Tracking::new();
  let x = fill(&t, &[1, 2, 3]);
  let y = x.clone();
  assert!(t.allocs() == 6);
  drop(x);
  assert!(t.frees() == 3);
  assert!(y.iter().collect::<Vec<_>>() == [1, 2, 3]);
  drop(y);
  assert!(t.live() == 0);
}

#[test]
fn test_assignment_releases_previous_chain() {
  let t = Tracking::new();
  let mut x = fill(&t, &[9, 9, 9, 9]);
  let y = fill(&t, &[1, 2]);
  x.clone_from(&y);
  assert!(t.allocs() == 8);
  assert!(t.frees() == 4);
  assert!(t.live() == 4);
  assert!(x.iter().collect::<Vec<_>>() == [1, 2]);
}

#[test]
fn test_reversed_view_is_released() {
  let t = Tracking::new();
  let x = fill(&t, &[1, 2, 3]);
  let r = x.reversed();
  assert!(t.live() == 6);
  drop(r);
  assert!(t.live() == 3);
}

#[test]
fn test_try_insert_failure_leaves_list_unchanged() {
  let t = Tracking::with_limit(3);
  let mut x = IntList::new_in(&t);
  assert!(x.try_insert_to_tail(1).is_ok());
  assert!(x.try_insert_to_tail(2).is_ok());
  assert!(x.try_insert_to_head(0).is_ok());
  assert!(x.try_insert_to_tail(3) == Err(AllocError));
  assert!(x.try_insert_to_head(3) == Err(AllocError));
  assert!(x.len() == 3);
  assert!(x.back() == Some(2));
  assert!(x.iter().collect::<Vec<_>>() == [0, 1, 2]);
  assert!(IntList::try_from_value_in(5, &t).is_err());
}

#[test]
fn test_try_clone_failure_releases_partial_copy() {
  let t = Tracking::with_limit(5);
  let x = fill(&t, &[1, 2, 3]);
  assert!(x.try_clone().is_err());
  assert!(t.allocs() == 5);
  assert!(t.frees() == 2);
  assert!(x.iter().collect::<Vec<_>>() == [1, 2, 3]);
}

#[test]
fn test_try_assign_failure_keeps_target() {
  let t = Tracking::with_limit(5);
  let mut x = fill(&t, &[7, 8]);
  let y = fill(&t, &[1, 2]);
  assert!(x.try_assign_from(&y) == Err(AllocError));
  assert!(x.iter().collect::<Vec<_>>() == [7, 8]);
  assert!(x.back() == Some(8));
  assert!(t.live() == 4);
}

#[test]
fn test_try_reversed_failure() {
  let t = Tracking::with_limit(4);
  let x = fill(&t, &[1, 2, 3]);
  assert!(x.try_reversed().is_err());
  assert!(t.live() == 3);
}

#[test]
fn test_try_sum_failure() {
  let t = Tracking::with_limit(5);
  let a = fill(&t, &[9, 9]);
  let b = fill(&t, &[1]);
  // 99 + 1 needs three result nodes, only two are left.
  let e = IntList::try_sum_lists(&a, &b).unwrap_err();
  assert!(e == SumError::Alloc(AllocError));
  assert!(t.live() == 3);
}

#[test]
fn test_sum_uses_left_allocator() {
  let t = Tracking::new();
  let a = fill(&t, &[7, 1, 6, 5, 4]);
  let b = fill(&t, &[5, 9, 2]);
  let c = IntList::sum_lists(&a, &b);
  assert!(t.allocs() == 13);
  expect!["[2, 1, 9, 5, 4]"].assert_eq(&format!("{:?}", c));
}

#[test]
fn test_bump() {
  let bump = Bump::new();
  let mut x = IntList::new_in(&bump);
  for i in 0 .. 100 {
    x.insert_to_tail(i % 10);
  }
  let y = x.clone();
  let s = IntList::sum_lists(&x, &y);
  assert!(s.len() == 101);
  assert!(s.back() == Some(1));
  expect!["[0, 2, 4, 6, 8, 0, 3, 5, 7, 9]"].assert_eq(&format!("{:?}", s.iter().take(10).collect::<Vec<_>>()));
  drop(s);
  drop(y);
  drop(x);
}

#[cfg(feature = "std")]
#[test]
fn test_print_without_clone_allocator() {
  let mut x = IntList::new_in(Tracking::new());
  x.insert_to_tail(1);
  x.insert_to_tail(2);
  x.print();
  expect!["1 --> 2 --> NULL"].assert_eq(&x.to_string());
}
