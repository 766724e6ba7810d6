#![doc = include_str!("../README.md")]
#![no_std]
#![cfg_attr(feature = "allocator_api", feature(allocator_api))]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

use alloc::string::String;
use allocator_api2::alloc::Allocator;
use allocator_api2::alloc::Global;
use core::alloc::Layout;
use core::fmt;
use core::fmt::Write as _;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::mem;
use core::ptr::NonNull;

////////////////////////////////////////////////////////////////////////////////
//                                                                            //
// SUBMODULES                                                                 //
//                                                                            //
////////////////////////////////////////////////////////////////////////////////

mod ptr;

////////////////////////////////////////////////////////////////////////////////
//                                                                            //
// PUBLIC TYPE AND TRAIT DEFINITIONS                                          //
//                                                                            //
////////////////////////////////////////////////////////////////////////////////

/// A singly linked list of `i32` values.
///
/// The list owns its chain of nodes exclusively. Every node is allocated from
/// the list's allocator `A` and released again when the list is dropped,
/// cleared, or overwritten by [`clone_from`](Clone::clone_from).
///
/// Insertion at either end is O(1).

pub struct IntList<A: Allocator = Global> {
  head: Option<NonNull<Node>>,
  tail: Option<NonNull<Node>>,
  len: usize,
  allocator: A,
  marker: PhantomData<Node>,
}

// SAFETY:
//
// The node chain is reachable only through the list, so the list follows the
// usual shared xor mutable discipline despite containing pointers.

unsafe impl<A: Allocator> Send for IntList<A> where A: Send { }

unsafe impl<A: Allocator> Sync for IntList<A> where A: Sync { }

/// A forward view of the values in an [`IntList`], head to tail.
///
/// Cloning the iterator copies its current position. Call
/// [`IntList::iter`] again to walk the list from the start.

#[derive(Clone)]
pub struct Iter<'a> {
  next: Option<NonNull<Node>>,
  len: usize,
  marker: PhantomData<&'a Node>,
}

unsafe impl<'a> Send for Iter<'a> { }

unsafe impl<'a> Sync for Iter<'a> { }

/// A reversed view of an [`IntList`].
///
/// The view owns an independent copy of the source list built by repeated
/// head insertion, so walking it forward yields the source tail to head. The
/// copy is released when the view is dropped.

pub struct Reversed<A: Allocator = Global>(IntList<A>);

/// The allocator failed to provide memory for a node.

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("digitlist: failed to allocate a list node")]
pub struct AllocError;

/// An error returned by [`IntList::try_sum_lists`].

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SumError {
  /// An operand holds a value that is not a single decimal digit.

  #[error("operand {operand} holds {value} at index {index}, which is not a decimal digit")]
  InvalidDigit {
    /// `0` for the left operand, `1` for the right operand.
    operand: usize,
    /// Position of the offending node, counting from the head.
    index: usize,
    /// The offending value.
    value: i32,
  },

  /// A node of the result could not be allocated.

  #[error(transparent)]
  Alloc(#[from] AllocError),
}

////////////////////////////////////////////////////////////////////////////////
//                                                                            //
// PRIVATE TYPE AND TRAIT DEFINITIONS                                         //
//                                                                            //
////////////////////////////////////////////////////////////////////////////////

struct Node {
  value: i32,
  next: Option<NonNull<Node>>,
}

enum Panicked { }

trait Fail: Sized {
  fn fail<T>(_: Layout) -> Result<T, Self>;
}

////////////////////////////////////////////////////////////////////////////////
//                                                                            //
// CONSTANTS                                                                  //
//                                                                            //
////////////////////////////////////////////////////////////////////////////////

const NODE: Layout = Layout::new::<Node>();

const RADIX: i32 = 10;

////////////////////////////////////////////////////////////////////////////////
//                                                                            //
// UTILITY FUNCTIONS                                                          //
//                                                                            //
////////////////////////////////////////////////////////////////////////////////

#[inline(always)]
fn unwrap<T>(x: Result<T, Panicked>) -> T {
  match x { Ok(x) => x, Err(e) => match e { } }
}

fn write_arrows(f: &mut fmt::Formatter<'_>, values: Iter<'_>) -> fmt::Result {
  for x in values {
    write!(f, "{} --> ", x)?;
  }
  f.write_str("NULL")
}

////////////////////////////////////////////////////////////////////////////////
//                                                                            //
// Fail                                                                       //
//                                                                            //
////////////////////////////////////////////////////////////////////////////////

impl Fail for Panicked {
  #[inline(never)]
  #[cold]
  fn fail<T>(layout: Layout) -> Result<T, Self> {
    alloc::alloc::handle_alloc_error(layout)
  }
}

impl Fail for AllocError {
  #[inline(always)]
  fn fail<T>(_: Layout) -> Result<T, Self> {
    Err(AllocError)
  }
}

////////////////////////////////////////////////////////////////////////////////
//                                                                            //
// Node                                                                       //
//                                                                            //
////////////////////////////////////////////////////////////////////////////////

#[inline(always)]
fn alloc_node<A, E>(allocator: &A, value: i32) -> Result<NonNull<Node>, E>
where
  A: Allocator,
  E: Fail,
{
  let Ok(p) = allocator.allocate(NODE) else {
    return E::fail(NODE);
  };

  let p = ptr::cast(p);

  unsafe { ptr::write(p, Node { value, next: None }) };

  Ok(p)
}

#[inline(always)]
unsafe fn free_node<A>(allocator: &A, p: NonNull<Node>) -> Option<NonNull<Node>>
where
  A: Allocator,
{
  // SAFETY:
  //
  // - `p` was allocated from `allocator` with layout `NODE`.
  // - No other node links to `p` any more.

  let next = ptr::as_ref(p).next;

  allocator.deallocate(ptr::cast(p), NODE);

  next
}

////////////////////////////////////////////////////////////////////////////////
//                                                                            //
// IntList                                                                    //
//                                                                            //
////////////////////////////////////////////////////////////////////////////////

fn insert_to_head<A, E>(list: &mut IntList<A>, value: i32) -> Result<(), E>
where
  A: Allocator,
  E: Fail,
{
  let p = alloc_node::<A, E>(&list.allocator, value)?;

  unsafe { ptr::as_mut_ref(p) }.next = list.head;

  if list.tail.is_none() {
    list.tail = Some(p);
  }

  list.head = Some(p);
  list.len = list.len + 1;

  Ok(())
}

fn insert_to_tail<A, E>(list: &mut IntList<A>, value: i32) -> Result<(), E>
where
  A: Allocator,
  E: Fail,
{
  let p = alloc_node::<A, E>(&list.allocator, value)?;

  match list.tail {
    None => list.head = Some(p),
    Some(t) => unsafe { ptr::as_mut_ref(t) }.next = Some(p),
  }

  list.tail = Some(p);
  list.len = list.len + 1;

  Ok(())
}

fn from_value<A, E>(value: i32, allocator: A) -> Result<IntList<A>, E>
where
  A: Allocator,
  E: Fail,
{
  let mut list = IntList::new_in(allocator);
  insert_to_tail::<A, E>(&mut list, value)?;
  Ok(list)
}

fn copy<A, E>(src: &IntList<A>) -> Result<IntList<A>, E>
where
  A: Allocator + Clone,
  E: Fail,
{
  // On failure the partial copy is dropped here, releasing what was built.

  let mut list = IntList::new_in(src.allocator.clone());

  for x in src.iter() {
    insert_to_tail::<A, E>(&mut list, x)?;
  }

  Ok(list)
}

fn assign<A, E>(dst: &mut IntList<A>, src: &IntList<A>) -> Result<(), E>
where
  A: Allocator + Clone,
  E: Fail,
{
  let mut tmp = copy::<A, E>(src)?;

  mem::swap(dst, &mut tmp);

  log::trace!("digitlist: reassigned list, {} nodes replaced by {}", tmp.len, dst.len);

  // NB: `tmp` now owns the previous chain, which is released here.

  drop(tmp);

  Ok(())
}

fn reversed<A, E>(src: &IntList<A>) -> Result<Reversed<A>, E>
where
  A: Allocator + Clone,
  E: Fail,
{
  let mut list = IntList::new_in(src.allocator.clone());

  for x in src.iter() {
    insert_to_head::<A, E>(&mut list, x)?;
  }

  Ok(Reversed(list))
}

fn release<A>(list: &mut IntList<A>) -> usize
where
  A: Allocator,
{
  // STACK SPACE:
  //
  // Nodes are released one at a time in a loop, so teardown uses constant
  // stack space whatever the length of the chain.

  let mut p = list.head.take();
  let mut n = 0;

  list.tail = None;
  list.len = 0;

  while let Some(q) = p {
    p = unsafe { free_node(&list.allocator, q) };
    n = n + 1;
  }

  n
}

fn check_digits<A>(list: &IntList<A>, operand: usize) -> Result<(), SumError>
where
  A: Allocator,
{
  for (index, value) in list.iter().enumerate() {
    if ! (0 .. RADIX).contains(&value) {
      return Err(SumError::InvalidDigit { operand, index, value });
    }
  }

  Ok(())
}

fn sum<A, E>(lhs: &IntList<A>, rhs: &IntList<A>) -> Result<IntList<A>, E>
where
  A: Allocator + Clone,
  E: Fail,
{
  // Both operands hold little-endian decimal digits. An exhausted operand
  // contributes zeros, and a carry left over at the end becomes one more
  // digit.

  let mut out = IntList::new_in(lhs.allocator.clone());
  let mut x = lhs.iter();
  let mut y = rhs.iter();
  let mut carry = 0;

  loop {
    let s =
      match (x.next(), y.next()) {
        (None, None) => break,
        (a, b) => a.unwrap_or(0) + b.unwrap_or(0) + carry,
      };

    insert_to_tail::<A, E>(&mut out, s % RADIX)?;
    carry = s / RADIX;
  }

  if carry != 0 {
    insert_to_tail::<A, E>(&mut out, carry)?;
  }

  log::debug!("digitlist: summed {} and {} digits into {} digits", lhs.len, rhs.len, out.len);

  Ok(out)
}

impl IntList<Global> {
  /// Creates an empty list backed by the global allocator.

  pub const fn new() -> Self {
    Self::new_in(Global)
  }

  /// Creates a list holding the single value `value`, backed by the global
  /// allocator.
  ///
  /// # Panics
  ///
  /// Aborts on failure to allocate memory.

  pub fn from_value(value: i32) -> Self {
    unwrap(from_value(value, Global))
  }

  /// Creates a list holding the single value `value`, backed by the global
  /// allocator.
  ///
  /// # Errors
  ///
  /// An error is returned on failure to allocate memory.

  pub fn try_from_value(value: i32) -> Result<Self, AllocError> {
    from_value(value, Global)
  }
}

impl<A: Allocator> IntList<A> {
  /// Creates an empty list whose nodes will be allocated from `allocator`.

  pub const fn new_in(allocator: A) -> Self {
    Self {
      head: None,
      tail: None,
      len: 0,
      allocator,
      marker: PhantomData,
    }
  }

  /// Creates a list holding the single value `value`, allocated from
  /// `allocator`.
  ///
  /// # Panics
  ///
  /// Aborts on failure to allocate memory.

  pub fn from_value_in(value: i32, allocator: A) -> Self {
    unwrap(from_value(value, allocator))
  }

  /// Creates a list holding the single value `value`, allocated from
  /// `allocator`.
  ///
  /// # Errors
  ///
  /// An error is returned on failure to allocate memory.

  pub fn try_from_value_in(value: i32, allocator: A) -> Result<Self, AllocError> {
    from_value(value, allocator)
  }

  /// Inserts `value` before the current head.
  ///
  /// # Panics
  ///
  /// Aborts on failure to allocate memory.

  pub fn insert_to_head(&mut self, value: i32) {
    unwrap(insert_to_head(self, value))
  }

  /// Inserts `value` before the current head.
  ///
  /// # Errors
  ///
  /// An error is returned on failure to allocate memory, in which case the
  /// list is unchanged.

  pub fn try_insert_to_head(&mut self, value: i32) -> Result<(), AllocError> {
    insert_to_head(self, value)
  }

  /// Inserts `value` after the current tail.
  ///
  /// # Panics
  ///
  /// Aborts on failure to allocate memory.

  pub fn insert_to_tail(&mut self, value: i32) {
    unwrap(insert_to_tail(self, value))
  }

  /// Inserts `value` after the current tail.
  ///
  /// # Errors
  ///
  /// An error is returned on failure to allocate memory, in which case the
  /// list is unchanged.

  pub fn try_insert_to_tail(&mut self, value: i32) -> Result<(), AllocError> {
    insert_to_tail(self, value)
  }

  /// The number of values in the list.

  #[inline(always)]
  pub fn len(&self) -> usize {
    self.len
  }

  /// Whether the list holds no values.

  #[inline(always)]
  pub fn is_empty(&self) -> bool {
    self.head.is_none()
  }

  /// The value at the head of the list.

  pub fn front(&self) -> Option<i32> {
    self.head.map(|p| unsafe { ptr::as_ref(p) }.value)
  }

  /// The value at the tail of the list.

  pub fn back(&self) -> Option<i32> {
    self.tail.map(|p| unsafe { ptr::as_ref(p) }.value)
  }

  /// Returns a forward view of the values, head to tail.

  pub fn iter(&self) -> Iter<'_> {
    Iter { next: self.head, len: self.len, marker: PhantomData }
  }

  /// Releases every node, leaving the list empty.

  pub fn clear(&mut self) {
    let n = release(self);
    log::trace!("digitlist: cleared list, released {} nodes", n);
  }

  /// A reference to the allocator backing the list.

  pub fn allocator(&self) -> &A {
    &self.allocator
  }

  /// Renders the values head to tail, each one followed by a single space.
  ///
  /// An empty list renders as the empty string.

  pub fn to_spaced_string(&self) -> String {
    let mut s = String::new();

    for x in self.iter() {
      let _: _ = write!(s, "{} ", x);
    }

    s
  }
}

impl<A: Allocator + Clone> IntList<A> {
  /// Creates an independent deep copy of the list.
  ///
  /// # Errors
  ///
  /// An error is returned on failure to allocate memory. Any nodes already
  /// copied are released.

  pub fn try_clone(&self) -> Result<Self, AllocError> {
    copy(self)
  }

  /// Replaces the contents of `self` with a deep copy of `src`.
  ///
  /// The copy is built in full before anything in `self` is touched. The
  /// previous chain is released afterwards, and `self` takes on the
  /// allocator of `src`.
  ///
  /// # Errors
  ///
  /// An error is returned on failure to allocate memory, in which case `self`
  /// is unchanged.

  pub fn try_assign_from(&mut self, src: &Self) -> Result<(), AllocError> {
    assign(self, src)
  }

  /// Returns a view of the values tail to head.
  ///
  /// # Panics
  ///
  /// Aborts on failure to allocate memory.

  pub fn reversed(&self) -> Reversed<A> {
    unwrap(reversed(self))
  }

  /// Returns a view of the values tail to head.
  ///
  /// # Errors
  ///
  /// An error is returned on failure to allocate memory.

  pub fn try_reversed(&self) -> Result<Reversed<A>, AllocError> {
    reversed(self)
  }

  /// Adds two numbers stored as little-endian decimal digits, least
  /// significant digit at the head.
  ///
  /// The result holds one digit per node, including a final carry digit
  /// when the sum is longer than both operands. It is allocated from the
  /// allocator of `lhs`.
  ///
  /// # Panics
  ///
  /// Panics if either operand holds a value outside `0 ..= 9`. Aborts on
  /// failure to allocate memory.

  pub fn sum_lists(lhs: &Self, rhs: &Self) -> Self {
    if let Err(e) = check_digits(lhs, 0).and_then(|()| check_digits(rhs, 1)) {
      panic!("digitlist: {}", e);
    }

    unwrap(sum(lhs, rhs))
  }

  /// Adds two numbers stored as little-endian decimal digits, least
  /// significant digit at the head.
  ///
  /// # Errors
  ///
  /// Returns [`SumError::InvalidDigit`] for the first value outside
  /// `0 ..= 9`, checking `lhs` before `rhs`, and [`SumError::Alloc`] on
  /// failure to allocate memory.

  pub fn try_sum_lists(lhs: &Self, rhs: &Self) -> Result<Self, SumError> {
    check_digits(lhs, 0)?;
    check_digits(rhs, 1)?;
    Ok(sum::<_, AllocError>(lhs, rhs)?)
  }
}

#[cfg(feature = "std")]
impl<A: Allocator> IntList<A> {
  /// Writes the values head to tail to standard output as
  /// `v1 --> v2 --> NULL`, followed by a newline.

  pub fn print(&self) {
    std::println!("{}", self);
  }
}

#[cfg(feature = "std")]
impl<A: Allocator + Clone> IntList<A> {
  /// Writes the values tail to head to standard output in the same format
  /// as [`print`](Self::print).
  ///
  /// # Panics
  ///
  /// Aborts on failure to allocate memory.

  pub fn print_backwards(&self) {
    std::println!("{}", self.reversed());
  }
}

impl<A: Allocator> Drop for IntList<A> {
  fn drop(&mut self) {
    let n = release(self);

    if n != 0 {
      log::trace!("digitlist: dropped list, released {} nodes", n);
    }
  }
}

impl<A: Allocator + Clone> Clone for IntList<A> {
  fn clone(&self) -> Self {
    unwrap(copy(self))
  }

  fn clone_from(&mut self, source: &Self) {
    unwrap(assign(self, source))
  }
}

impl<A: Allocator + Default> Default for IntList<A> {
  fn default() -> Self {
    Self::new_in(A::default())
  }
}

impl<A: Allocator, B: Allocator> PartialEq<IntList<B>> for IntList<A> {
  fn eq(&self, other: &IntList<B>) -> bool {
    self.len == other.len && self.iter().eq(other.iter())
  }
}

impl<A: Allocator> Eq for IntList<A> { }

impl<A: Allocator> Extend<i32> for IntList<A> {
  fn extend<I: IntoIterator<Item = i32>>(&mut self, iter: I) {
    for x in iter {
      self.insert_to_tail(x);
    }
  }
}

impl FromIterator<i32> for IntList<Global> {
  fn from_iter<I: IntoIterator<Item = i32>>(iter: I) -> Self {
    let mut list = Self::new();
    list.extend(iter);
    list
  }
}

impl<'a, A: Allocator> IntoIterator for &'a IntList<A> {
  type Item = i32;
  type IntoIter = Iter<'a>;

  fn into_iter(self) -> Iter<'a> {
    self.iter()
  }
}

impl<A: Allocator> fmt::Debug for IntList<A> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(self.iter()).finish()
  }
}

impl<A: Allocator> fmt::Display for IntList<A> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write_arrows(f, self.iter())
  }
}

////////////////////////////////////////////////////////////////////////////////
//                                                                            //
// Iter                                                                       //
//                                                                            //
////////////////////////////////////////////////////////////////////////////////

impl<'a> Iterator for Iter<'a> {
  type Item = i32;

  #[inline(always)]
  fn next(&mut self) -> Option<i32> {
    let p = self.next?;
    let n = unsafe { ptr::as_ref::<'a, Node>(p) };
    self.next = n.next;
    self.len = self.len - 1;
    Some(n.value)
  }

  #[inline(always)]
  fn size_hint(&self) -> (usize, Option<usize>) {
    (self.len, Some(self.len))
  }
}

impl<'a> ExactSizeIterator for Iter<'a> { }

impl<'a> FusedIterator for Iter<'a> { }

impl<'a> fmt::Debug for Iter<'a> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(self.clone()).finish()
  }
}

////////////////////////////////////////////////////////////////////////////////
//                                                                            //
// Reversed                                                                   //
//                                                                            //
////////////////////////////////////////////////////////////////////////////////

impl<A: Allocator> Reversed<A> {
  /// Returns an iterator over the values of the source list, tail to head.

  pub fn iter(&self) -> Iter<'_> {
    self.0.iter()
  }

  /// The number of values in the view.

  pub fn len(&self) -> usize {
    self.0.len()
  }

  /// Whether the view holds no values.

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Takes ownership of the reversed copy as an ordinary list.

  pub fn into_list(self) -> IntList<A> {
    self.0
  }
}

impl<'a, A: Allocator> IntoIterator for &'a Reversed<A> {
  type Item = i32;
  type IntoIter = Iter<'a>;

  fn into_iter(self) -> Iter<'a> {
    self.iter()
  }
}

impl<A: Allocator> fmt::Debug for Reversed<A> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Reversed").field(&self.0).finish()
  }
}

impl<A: Allocator> fmt::Display for Reversed<A> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write_arrows(f, self.iter())
  }
}
