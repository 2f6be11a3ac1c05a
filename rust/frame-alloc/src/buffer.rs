//! Aligned buffer allocation for native video frame callbacks.
//!
//! Native media decoders that write frames directly into caller-provided
//! memory typically require the destination address to be aligned more
//! strongly than a general-purpose allocator guarantees (32 bytes is the
//! common requirement, for SIMD stores and DMA transfers). [`FrameBuffer`]
//! provides the guarantee portably: it allocates `capacity + alignment` raw
//! bytes, advances to the first aligned address inside the region, and
//! exposes exactly `capacity` bytes starting there.
//!
//! # Safety
//!
//! While `FrameBuffer` implements `Send` and `Sync`, users must ensure that
//! data written into the buffer is properly synchronized when accessed from
//! multiple threads.

use std::alloc::{Layout, alloc_zeroed, dealloc};
use std::ptr::NonNull;

use crate::align;
use crate::error::{Error, Result};

/// A fixed-capacity native memory buffer whose starting address is aligned
/// to a caller-specified power-of-two boundary.
///
/// The raw region is over-allocated by `alignment` slack bytes, which
/// guarantees that an aligned starting address with `capacity` bytes after
/// it exists for any base address the allocator returns. All accessors are
/// bounded by the aligned window; the slack bytes are never exposed.
///
/// The region is zero-initialized. A native producer writes frame data
/// through [`Self::as_mut_ptr`] (or [`Self::as_bytes_mut`]); multi-byte
/// access through the typed views reinterprets the underlying bytes in the
/// platform's native byte order.
pub struct FrameBuffer {
    /// Base of the raw allocation. Deallocation must use this address, not
    /// the aligned view address.
    base: NonNull<u8>,
    /// Layout the raw region was allocated with (`len + alignment` bytes).
    layout: Layout,
    /// Byte distance from `base` to the first `alignment`-aligned address.
    offset: usize,
    /// Length of the aligned view, exactly the requested capacity.
    len: usize,
    /// The alignment guarantee of the view's starting address.
    alignment: usize,
}

impl FrameBuffer {
    /// Alignment suitable for buffers handed to native video frame
    /// callbacks.
    pub const DEFAULT_ALIGNMENT: usize = 32;

    /// Allocates a buffer aligned for native video frame callbacks.
    ///
    /// Equivalent to [`Self::allocate_with_alignment`] with
    /// [`Self::DEFAULT_ALIGNMENT`].
    ///
    /// # Arguments
    ///
    /// * `capacity` - Size of the buffer in bytes (must be greater than
    ///   zero)
    ///
    /// # Errors
    ///
    /// Returns an error if `capacity` is zero or the native allocation
    /// fails.
    pub fn allocate(capacity: usize) -> Result<FrameBuffer> {
        Self::allocate_with_alignment(capacity, Self::DEFAULT_ALIGNMENT)
    }

    /// Allocates a buffer of exactly `capacity` bytes whose starting
    /// address is a multiple of `alignment`.
    ///
    /// A raw region of `capacity + alignment` bytes is requested from the
    /// global allocator with no particular alignment of its own. The view
    /// is then placed `alignment - (base % alignment)` bytes in (zero when
    /// the base address is already aligned), so the guarantee holds no
    /// matter where the raw region lands.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Size of the buffer in bytes (must be greater than
    ///   zero)
    /// * `alignment` - Required alignment of the starting address (must be
    ///   a nonzero power of two)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `alignment` is zero or not a power of two
    /// - `capacity` is zero
    /// - `capacity + alignment` exceeds the maximum allocation size
    /// - the global allocator cannot satisfy the request
    pub fn allocate_with_alignment(capacity: usize, alignment: usize) -> Result<FrameBuffer> {
        if alignment == 0 || !alignment.is_power_of_two() {
            return Err(Error::InvalidAlignment { alignment });
        }
        if capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        let raw_size = capacity
            .checked_add(alignment)
            .ok_or(Error::SizeOverflow {
                capacity,
                alignment,
            })?;
        let layout = Layout::from_size_align(raw_size, 1).map_err(|_| Error::SizeOverflow {
            capacity,
            alignment,
        })?;

        let base = unsafe { alloc_zeroed(layout) };
        let base = NonNull::new(base).ok_or(Error::AllocationFailed { size: raw_size })?;

        let offset = align::aligned_offset(base.as_ptr() as usize, alignment);
        debug_assert!(offset < alignment);
        debug_assert!(offset + capacity <= raw_size);
        assert!(align::is_aligned(base.as_ptr() as usize + offset, alignment));

        log::debug!(
            "allocated {capacity}-byte frame buffer aligned to {alignment} (offset {offset})"
        );

        Ok(FrameBuffer {
            base,
            layout,
            offset,
            len: capacity,
            alignment,
        })
    }

    /// Returns the length of the buffer in bytes.
    ///
    /// This is exactly the capacity that was requested at allocation; the
    /// slack bytes used for alignment adjustment are not counted.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the buffer has a length of 0.
    ///
    /// A successfully allocated buffer always has a nonzero length; this is
    /// provided for symmetry with the slice API.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the alignment of the buffer's starting address in bytes.
    #[inline]
    pub fn alignment(&self) -> usize {
        self.alignment
    }

    /// Returns the number of bytes skipped between the raw allocation's
    /// base address and the start of the aligned view.
    ///
    /// Always less than [`Self::alignment`]; zero when the raw region
    /// happened to land on an aligned address.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the total allocated size in bytes, including the alignment
    /// slack.
    #[inline]
    pub fn heap_size(&self) -> usize {
        self.layout.size()
    }

    /// Checks if the buffer's starting address is aligned to the specified
    /// alignment.
    ///
    /// # Arguments
    ///
    /// * `alignment` - The alignment to check for. This must be a nonzero
    ///   power of two.
    #[inline]
    pub fn is_aligned(&self, alignment: usize) -> bool {
        align::is_aligned(self.as_ptr() as usize, alignment)
    }

    /// Returns a raw pointer to the start of the aligned view.
    ///
    /// This is the address handed to a native frame producer; it is valid
    /// for reads of up to [`Self::len`] bytes for as long as the buffer is
    /// alive.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        unsafe { self.base.as_ptr().add(self.offset) }
    }

    /// Returns a mutable raw pointer to the start of the aligned view.
    ///
    /// # Safety
    ///
    /// The pointer itself is safe to obtain. Callers writing through it
    /// must stay within [`Self::len`] bytes and must not use the pointer
    /// after the `FrameBuffer` is dropped.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        unsafe { self.base.as_ptr().add(self.offset) }
    }

    /// Returns an immutable byte slice view of the buffer contents.
    ///
    /// The slice covers the aligned view only — exactly [`Self::len`]
    /// bytes, never the slack.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    /// Returns a mutable byte slice view of the buffer contents.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        unsafe { std::slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
    }

    /// Returns an immutable slice of type `T` over the buffer's contents.
    ///
    /// The bytes are reinterpreted in place, so values are read in the
    /// platform's native byte order. The slice holds
    /// `self.len() / size_of::<T>()` elements.
    ///
    /// # Type Requirements
    ///
    /// The type `T` must implement `bytemuck::AnyBitPattern`, which ensures
    /// that any bit pattern is a valid value for the type.
    ///
    /// # Panics
    ///
    /// Panics if the buffer's length is not evenly divisible by the size of
    /// `T`, or if the view's address is insufficiently aligned for `T`
    /// (allocate with an alignment of at least `align_of::<T>()`).
    #[inline]
    pub fn typed_data<T>(&self) -> &[T]
    where
        T: bytemuck::AnyBitPattern,
    {
        bytemuck::cast_slice(self.as_bytes())
    }

    /// Returns a mutable slice of type `T` over the buffer's contents.
    ///
    /// The bytes are reinterpreted in place, so values are written in the
    /// platform's native byte order.
    ///
    /// # Type Requirements
    ///
    /// The type `T` must implement both:
    /// - `bytemuck::AnyBitPattern`: ensures any bit pattern is a valid value
    /// - `bytemuck::NoUninit`: ensures the type has no uninitialized bytes
    ///
    /// # Panics
    ///
    /// Panics if the buffer's length is not evenly divisible by the size of
    /// `T`, or if the view's address is insufficiently aligned for `T`
    /// (allocate with an alignment of at least `align_of::<T>()`).
    #[inline]
    pub fn typed_data_mut<T>(&mut self) -> &mut [T]
    where
        T: bytemuck::AnyBitPattern + bytemuck::NoUninit,
    {
        bytemuck::cast_slice_mut(self.as_bytes_mut())
    }
}

impl std::ops::Deref for FrameBuffer {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_bytes()
    }
}

impl std::ops::DerefMut for FrameBuffer {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_bytes_mut()
    }
}

impl AsRef<[u8]> for FrameBuffer {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsMut<[u8]> for FrameBuffer {
    #[inline]
    fn as_mut(&mut self) -> &mut [u8] {
        self.as_bytes_mut()
    }
}

impl Drop for FrameBuffer {
    /// Releases the raw allocation back to the global allocator.
    ///
    /// Deallocation uses the retained base address and the layout from
    /// allocation time — not the aligned view address — so the region is
    /// released correctly exactly once.
    fn drop(&mut self) {
        unsafe { dealloc(self.base.as_ptr(), self.layout) }
    }
}

// SAFETY: FrameBuffer can be safely sent between threads as it exclusively
// owns the memory region and deallocates it on drop.
unsafe impl Send for FrameBuffer {}

// SAFETY: FrameBuffer can be safely shared between threads; shared access
// only permits reads, and users must synchronize any writes themselves.
unsafe impl Sync for FrameBuffer {}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("ptr", &self.as_ptr())
            .field("len", &self.len)
            .field("alignment", &self.alignment)
            .field("offset", &self.offset)
            .finish()
    }
}
