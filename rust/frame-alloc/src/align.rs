/// Computes the byte offset from an address to the next multiple of the
/// specified alignment.
///
/// Returns `0` when the address is already aligned. Otherwise returns the
/// number of bytes to advance so that `addr + offset` is a multiple of
/// `alignment`. The result is always in `[0, alignment)`, so adding it to
/// `addr` cannot overflow past the next alignment boundary.
///
/// # Arguments
///
/// * `addr` - The numeric memory address to adjust
/// * `alignment` - The alignment boundary (must be a power of 2 and non-zero)
///
/// # Examples
///
/// ```
/// use frame_alloc::align::aligned_offset;
///
/// assert_eq!(aligned_offset(0x1000, 32), 0);
/// assert_eq!(aligned_offset(0x1003, 32), 29);
/// assert_eq!(aligned_offset(0x1020, 32), 0);
/// assert_eq!(aligned_offset(0x1021, 32), 31);
/// assert_eq!(aligned_offset(7, 1), 0);
/// ```
///
/// # Panics
///
/// This function will panic in debug builds if:
/// - `alignment` is 0
/// - `alignment` is not a power of 2
#[inline]
pub fn aligned_offset(addr: usize, alignment: usize) -> usize {
    debug_assert_ne!(alignment, 0);
    debug_assert!(alignment.is_power_of_two());
    let remainder = addr & (alignment - 1);
    if remainder == 0 {
        0
    } else {
        alignment - remainder
    }
}

/// Checks if an address lies exactly on the specified alignment boundary.
///
/// # Arguments
///
/// * `addr` - The numeric memory address to check
/// * `alignment` - The alignment boundary (must be a power of 2 and non-zero)
///
/// # Examples
///
/// ```
/// use frame_alloc::align::is_aligned;
///
/// assert!(is_aligned(0, 32));
/// assert!(is_aligned(0x1000, 32));
/// assert!(!is_aligned(0x1003, 32));
/// assert!(is_aligned(0x1003, 1));
/// ```
///
/// # Panics
///
/// This function will panic in debug builds if:
/// - `alignment` is 0
/// - `alignment` is not a power of 2
#[inline]
pub fn is_aligned(addr: usize, alignment: usize) -> bool {
    debug_assert_ne!(alignment, 0);
    debug_assert!(alignment.is_power_of_two());
    (addr & (alignment - 1)) == 0
}
