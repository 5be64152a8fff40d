//! A minimal spinlock for serializing access to an index from several threads.
//!
//! The trees in this crate do no locking of their own. Wrapping the arena and the tree
//! together, e.g. `SpinMutex<(NodeArena<u64>, RbTree<u64>)>`, and holding the lock across a
//! whole operation (or a whole traversal) is enough to share them.

use std::cell::UnsafeCell;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};

// following along with https://www.youtube.com/watch?v=rMGWeSjctlY
pub struct SpinMutex<T: ?Sized> {
    locked: AtomicBool,
    value: UnsafeCell<T>,
}

// SAFETY: the lock hands out at most one `&mut T` at a time, so sharing the mutex only ever
//         moves access to the `T` between threads.
unsafe impl<T: ?Sized + Send> Sync for SpinMutex<T> {}

impl<T> SpinMutex<T> {
    pub const fn new(value: T) -> Self {
        Self {
            locked: AtomicBool::new(false),
            value: UnsafeCell::new(value),
        }
    }

    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }
}

impl<T: ?Sized> SpinMutex<T> {
    // https://matklad.github.io/2020/01/02/spinlocks-considered-harmful.html
    pub fn lock(&self) -> SpinMutexGuard<'_, T> {
        while self.locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            // wait on a plain load so we don't keep stealing the cache line
            while self.locked.load(Ordering::Relaxed) {
                std::hint::spin_loop();
                std::thread::yield_now();
            }
        }

        SpinMutexGuard { mutex: self }
    }

    /// Takes the lock only if nobody holds it right now.
    pub fn try_lock(&self) -> Option<SpinMutexGuard<'_, T>> {
        match self.locked.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed) {
            Ok(_) => Some(SpinMutexGuard { mutex: self }),
            Err(_) => None,
        }
    }

    /// Runs `f` with the lock held.
    pub fn with_lock<F, R>(&self, f: F) -> R where F: FnOnce(&mut T) -> R {
        let mut guard = self.lock();
        f(&mut *guard)
    }

    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }

    /// Given an exclusive reference to the mutex, no locking is needed.
    pub fn get_mut(&mut self) -> &mut T {
        self.value.get_mut()
    }
}

impl<T: Default> Default for SpinMutex<T> {
    fn default() -> Self {
        SpinMutex::new(T::default())
    }
}

/// Exclusive access to the value behind a [`SpinMutex`], released on drop.
///
/// Sharing a guard between threads shares `&T`, so the guard is only `Sync` when `T` is:
///
/// ```compile_fail
/// use std::cell::Cell;
/// use rbindex::SpinMutexGuard;
///
/// fn assert_sync<T: Sync>() {}
/// assert_sync::<SpinMutexGuard<'static, Cell<i32>>>();
/// ```
pub struct SpinMutexGuard<'a, T: ?Sized> {
    // NOTE: only one guard per mutex exists at a time
    mutex: &'a SpinMutex<T>,
}

// SAFETY: `&SpinMutexGuard<T>` only ever hands out `&T`, which other threads may hold when
//         `T: Sync`. The auto impl would only ask for `T: Send` through `&SpinMutex<T>`.
unsafe impl<T: ?Sized + Sync> Sync for SpinMutexGuard<'_, T> {}

impl<T: ?Sized> Deref for SpinMutexGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        // SAFETY: holding the guard means holding the lock.
        unsafe { &*self.mutex.value.get() }
    }
}

impl<T: ?Sized> DerefMut for SpinMutexGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: holding the guard means holding the lock.
        unsafe { &mut *self.mutex.value.get() }
    }
}

impl<T: ?Sized> Drop for SpinMutexGuard<'_, T> {
    fn drop(&mut self) {
        // store(Release) → everything done under the lock is seen by the next load(Acquire)
        self.mutex.locked.store(false, Ordering::Release);
    }
}
