use allocator_api2::alloc::AllocError;
use allocator_api2::alloc::Allocator;
use allocator_api2::alloc::Global;
use core::alloc::Layout;
use core::cell::Cell;
use core::ptr::NonNull;

/// Counts allocations and deallocations made through it, and refuses to
/// allocate once `limit` allocations have been made.

pub(crate) struct Tracking {
  allocs: Cell<usize>,
  frees: Cell<usize>,
  limit: usize,
}

impl Tracking {
  pub(crate) fn new() -> Self {
    Self::with_limit(usize::MAX)
  }

  pub(crate) fn with_limit(limit: usize) -> Self {
    Self { allocs: Cell::new(0), frees: Cell::new(0), limit }
  }

  pub(crate) fn allocs(&self) -> usize {
    self.allocs.get()
  }

  pub(crate) fn frees(&self) -> usize {
    self.frees.get()
  }

  pub(crate) fn live(&self) -> usize {
    self.allocs() - self.frees()
  }
}

unsafe impl Allocator for Tracking {
  fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
    if self.allocs.get() >= self.limit {
      return Err(AllocError);
    }

    self.allocs.set(self.allocs.get() + 1);
    Global.allocate(layout)
  }

  unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
    self.frees.set(self.frees.get() + 1);
    Global.deallocate(ptr, layout)
  }
}
