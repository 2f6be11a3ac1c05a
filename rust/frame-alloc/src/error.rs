use thiserror::Error;

/// Errors surfaced while allocating an aligned frame buffer.
///
/// Allocation either returns a fully formed, correctly aligned buffer or one
/// of these errors; there are no partial-success states.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested alignment is not a nonzero power of two.
    ///
    /// The offset adjustment relies on `addr & (alignment - 1)`, which is
    /// only meaningful for powers of two, so the argument is rejected up
    /// front instead of producing a silently misaligned buffer.
    #[error("invalid alignment {alignment}: must be a nonzero power of two")]
    InvalidAlignment { alignment: usize },

    /// The requested capacity was zero.
    #[error("invalid capacity: must be greater than zero")]
    ZeroCapacity,

    /// `capacity + alignment` overflows or exceeds the maximum size the
    /// allocator accepts; no allocation was attempted.
    #[error(
        "buffer of {capacity} bytes plus {alignment} slack bytes exceeds the maximum allocation size"
    )]
    SizeOverflow { capacity: usize, alignment: usize },

    /// The native allocator could not satisfy the request.
    #[error("native allocation of {size} bytes failed")]
    AllocationFailed { size: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
