//! Scoped container activation
//!
//! The host's active container is process-wide state. Grouping an import
//! means activating a fresh container, importing, and putting the previous
//! container back. `ContainerScope` ties the put-back to a value's lifetime
//! so it also happens when the import inside the scope fails or panics.

use crate::authoring::SceneAuthoring;
use std::ops::{Deref, DerefMut};
use strata_core::{ContainerHandle, Result};

/// An active container, restored to the previous one when closed or dropped.
///
/// Derefs to the host so nested work (and nested scopes) run through it.
pub struct ContainerScope<'a, H: SceneAuthoring + ?Sized> {
    host: &'a mut H,
    container: ContainerHandle,
    previous: Option<ContainerHandle>,
}

impl<'a, H: SceneAuthoring + ?Sized> ContainerScope<'a, H> {
    /// Create a container named `name` and make it active
    pub fn enter(host: &'a mut H, name: &str) -> Result<Self> {
        let container = host.create_container(name)?;
        let previous = host.set_active_container(container)?;
        log::debug!("entered container '{}' ({})", name, container);
        Ok(Self {
            host,
            container,
            previous: Some(previous),
        })
    }

    /// The container this scope activated
    pub fn container(&self) -> ContainerHandle {
        self.container
    }

    /// Restore the previous container, reporting a failed restore
    pub fn close(mut self) -> Result<()> {
        match self.previous.take() {
            Some(previous) => {
                self.host.set_active_container(previous)?;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl<H: SceneAuthoring + ?Sized> Deref for ContainerScope<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.host
    }
}

impl<H: SceneAuthoring + ?Sized> DerefMut for ContainerScope<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.host
    }
}

impl<H: SceneAuthoring + ?Sized> Drop for ContainerScope<'_, H> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            if let Err(e) = self.host.set_active_container(previous) {
                log::warn!(
                    "failed to restore container {} after leaving {}: {}",
                    previous,
                    self.container,
                    e
                );
            }
        }
    }
}

/// Run `f` inside a fresh container when `group` is set, directly otherwise.
///
/// On success the restore error (if any) is reported; when `f` fails its
/// error wins and the restore happens on drop.
pub fn in_container<H, T, F>(host: &mut H, group: bool, name: &str, f: F) -> Result<T>
where
    H: SceneAuthoring + ?Sized,
    F: FnOnce(&mut H) -> Result<T>,
{
    if !group {
        return f(host);
    }

    let mut scope = ContainerScope::enter(host, name)?;
    let value = f(&mut *scope)?;
    scope.close()?;
    Ok(value)
}
