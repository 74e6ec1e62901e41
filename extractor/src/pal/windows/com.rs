use std::marker::PhantomData;
use windows::core::Error as Win32Error;
use windows::Win32::System::Com::{CoInitializeEx, CoUninitialize, COINIT_APARTMENTTHREADED};

/// Membership of the current thread in a COM apartment.
///
/// The apartment is left again when this guard is dropped, which must happen on
/// the thread that entered it.
#[derive(Debug)]
pub struct ComApartment {
    // COM apartments are bound to a thread
    _not_send: PhantomData<*const ()>,
}

impl ComApartment {
    /// Enters a single-threaded apartment on the current thread.
    pub fn enter_single_threaded() -> Result<Self, Win32Error> {
        unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED)? };
        tracing::trace!("Entered single-threaded COM apartment");

        Ok(Self {
            _not_send: PhantomData,
        })
    }
}

impl Drop for ComApartment {
    fn drop(&mut self) {
        unsafe { CoUninitialize() };
        tracing::trace!("Left COM apartment");
    }
}
