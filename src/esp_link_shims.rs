//! `critical-section` implementation for the ESP-IDF std runtime.
//!
//! `embassy-sync`'s `CriticalSectionRawMutex` goes through the
//! `critical-section` crate, which expects the platform to register an
//! implementation. On ESP-IDF both execution contexts are pthreads, so a
//! process-wide std mutex gives the required mutual exclusion; nesting on
//! the same thread is tracked with a thread-local depth counter.

use core::cell::{Cell, RefCell};
use std::sync::{Mutex, MutexGuard, PoisonError};

use critical_section::RawRestoreState;

static CRITICAL_SECTION_MUTEX: Mutex<()> = Mutex::new(());

thread_local! {
    static CRITICAL_SECTION_DEPTH: Cell<u8> = const { Cell::new(0) };
    static CRITICAL_SECTION_GUARD: RefCell<Option<MutexGuard<'static, ()>>> = const { RefCell::new(None) };
}

struct PthreadCriticalSection;
critical_section::set_impl!(PthreadCriticalSection);

// SAFETY: the std mutex excludes every other thread while depth > 0 and is
// only released by the outermost `release` on the acquiring thread.
unsafe impl critical_section::Impl for PthreadCriticalSection {
    unsafe fn acquire() -> RawRestoreState {
        CRITICAL_SECTION_DEPTH.with(|depth| {
            let d = depth.get();
            if d == 0 {
                // A panic inside a critical section leaves plain data behind.
                let lock = CRITICAL_SECTION_MUTEX
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                CRITICAL_SECTION_GUARD.with(|guard| *guard.borrow_mut() = Some(lock));
            }
            depth.set(d.saturating_add(1));
        });
    }

    unsafe fn release(_restore: RawRestoreState) {
        CRITICAL_SECTION_DEPTH.with(|depth| {
            let d = depth.get();
            if d == 0 {
                return;
            }
            depth.set(d - 1);
            if d == 1 {
                CRITICAL_SECTION_GUARD.with(|guard| *guard.borrow_mut() = None);
            }
        });
    }
}
