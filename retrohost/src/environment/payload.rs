use std::ffi::c_void;
use std::ptr;

/// The untyped argument of an environment command.
///
/// Its shape is fixed by the command code; handlers read and write it through the typed
/// accessors, which are only sound for the type the command documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payload(*mut c_void);

impl Payload {
    /// Wraps a payload pointer received from a core.
    ///
    /// # Safety
    /// `data` must be null or valid for the command it is dispatched with.
    #[inline]
    pub unsafe fn new(data: *mut c_void) -> Self {
        Self(data)
    }

    #[inline]
    pub fn null() -> Self {
        Self(ptr::null_mut())
    }

    /// Borrows `value` as the payload.
    ///
    /// # Safety
    /// `T` must be the payload type of the command this is dispatched with.
    #[inline]
    pub unsafe fn from_mut<T>(value: &mut T) -> Self {
        Self((value as *mut T).cast())
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    #[inline]
    pub fn as_ptr(&self) -> *mut c_void {
        self.0
    }

    #[inline]
    pub(crate) fn read<T: Copy>(&self) -> Option<T> {
        // SAFETY: guaranteed by the contract of `new`.
        (!self.is_null()).then(|| unsafe { ptr::read_unaligned(self.0.cast::<T>()) })
    }

    /// Writes `value` into the payload. Returns false for a null payload.
    #[inline]
    pub(crate) fn write<T>(&self, value: T) -> bool {
        if self.is_null() {
            return false;
        }
        // SAFETY: guaranteed by the contract of `new`.
        unsafe { ptr::write_unaligned(self.0.cast::<T>(), value) };
        true
    }

    #[inline]
    pub(crate) fn get<'a, T>(&self) -> Option<&'a T> {
        // SAFETY: guaranteed by the contract of `new`; the payload outlives the dispatch.
        unsafe { self.0.cast::<T>().as_ref() }
    }

    #[inline]
    pub(crate) fn get_mut<'a, T>(&self) -> Option<&'a mut T> {
        // SAFETY: as above.
        unsafe { self.0.cast::<T>().as_mut() }
    }
}
