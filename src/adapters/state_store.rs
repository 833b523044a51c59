//! Activation-token storage adapter (NVS).
//!
//! Implements [`StatePort`] on top of ESP-IDF NVS: one short string under
//! a well-known key. NVS commits are atomic, so a brown-out mid-write
//! leaves the previous token intact rather than a torn one. The
//! simulation backend keeps the token in a `RefCell` for host tests.

use log::info;
#[cfg(target_os = "espidf")]
use log::warn;

use crate::app::activation::ActivationState;
use crate::app::ports::StatePort;
use crate::error::StorageError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
const STATE_NAMESPACE: &[u8] = b"infinitree\0";
#[cfg(target_os = "espidf")]
const STATE_KEY: &[u8] = b"last_state\0";

pub struct StateStoreAdapter {
    #[cfg(not(target_os = "espidf"))]
    token: std::cell::RefCell<Option<String>>,
}

impl StateStoreAdapter {
    /// Initialise NVS flash and open the adapter.
    ///
    /// On first boot or after an NVS version bump the partition is erased
    /// and re-initialised automatically. A flash that refuses to come up
    /// degrades to `Unknown` reads at startup rather than failing boot,
    /// so this constructor is infallible.
    pub fn new() -> Self {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase are called from the
            // single main-task context before any other NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                warn!("NVS: erasing and re-initialising flash partition");
                unsafe {
                    nvs_flash_erase();
                    nvs_flash_init();
                }
            } else if ret != ESP_OK {
                warn!("NVS: init failed (rc={ret}), state reads will be Unknown");
            }
            info!("StateStoreAdapter: ESP-IDF NVS backend");
            Self {}
        }

        #[cfg(not(target_os = "espidf"))]
        {
            info!("StateStoreAdapter: simulation backend");
            Self {
                token: std::cell::RefCell::new(None),
            }
        }
    }

    /// Pre-load a token into the simulation backend.
    #[cfg(not(target_os = "espidf"))]
    pub fn seed(&self, state: ActivationState) {
        *self.token.borrow_mut() = Some(state.as_token().to_owned());
    }

    /// Open the state namespace, run a closure with the handle, then close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let ret = unsafe { nvs_open(STATE_NAMESPACE.as_ptr() as *const _, mode, &mut handle) };
        if ret != ESP_OK {
            return Err(ret);
        }

        let result = f(handle);
        unsafe {
            nvs_close(handle);
        }
        result
    }
}

impl Default for StateStoreAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl StatePort for StateStoreAdapter {
    fn load(&mut self) -> ActivationState {
        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(false, |handle| {
                let mut buf = [0u8; 16];
                let mut size = buf.len();
                let ret = unsafe {
                    nvs_get_str(
                        handle,
                        STATE_KEY.as_ptr() as *const _,
                        buf.as_mut_ptr() as *mut _,
                        &mut size,
                    )
                };
                if ret != ESP_OK {
                    return Err(ret);
                }
                let text = core::str::from_utf8(&buf[..size.saturating_sub(1)]).map_err(|_| ESP_FAIL)?;
                Ok(ActivationState::from_token(text))
            });
            result.unwrap_or(ActivationState::Unknown)
        }

        #[cfg(not(target_os = "espidf"))]
        {
            self.token
                .borrow()
                .as_deref()
                .map_or(ActivationState::Unknown, ActivationState::from_token)
        }
    }

    fn store(&mut self, state: ActivationState) -> Result<(), StorageError> {
        #[cfg(target_os = "espidf")]
        {
            let mut token = [0u8; 16];
            let text = state.as_token().as_bytes();
            token[..text.len()].copy_from_slice(text);

            Self::with_nvs_handle(true, |handle| {
                let ret = unsafe {
                    nvs_set_str(handle, STATE_KEY.as_ptr() as *const _, token.as_ptr() as *const _)
                };
                if ret != ESP_OK {
                    return Err(ret);
                }
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(())
            })
            .map_err(|rc| {
                warn!("NVS: failed to store '{state}' (rc={rc})");
                StorageError::WriteFailed
            })
        }

        #[cfg(not(target_os = "espidf"))]
        {
            *self.token.borrow_mut() = Some(state.as_token().to_owned());
            Ok(())
        }
    }
}
