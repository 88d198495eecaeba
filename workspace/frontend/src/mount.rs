use std::cell::RefCell;
use wasm_bindgen::prelude::wasm_bindgen;
use web_sys::{window, Element};
use yew::AppHandle;

use crate::components::user_header::UserHeader;

/// Host candidates for the header, most specific first.
const HEADER_CONTAINERS: [&str; 7] = [
    ".app-header",
    "header",
    ".navbar",
    ".top-bar",
    "#header",
    ".main-header",
    "body",
];

const MOUNT_ID: &str = "user-header-root";

/// Explicit mounted state: holds whatever keeps the mounted view alive.
struct MountSlot<T> {
    occupant: RefCell<Option<T>>,
}

impl<T> Default for MountSlot<T> {
    fn default() -> Self {
        Self { occupant: RefCell::new(None) }
    }
}

impl<T> MountSlot<T> {
    fn is_mounted(&self) -> bool {
        self.occupant.borrow().is_some()
    }

    /// Fills an empty slot with `create()`; does nothing when already mounted
    /// or when `create` yields nothing.
    fn mount_with<F>(&self, create: F) -> bool
    where
        F: FnOnce() -> Option<T>,
    {
        if self.is_mounted() {
            return false;
        }
        match create() {
            Some(occupant) => {
                *self.occupant.borrow_mut() = Some(occupant);
                true
            }
            None => false,
        }
    }

    fn release(&self) -> Option<T> {
        self.occupant.borrow_mut().take()
    }
}

type HeaderMount = MountSlot<(AppHandle<UserHeader>, Element)>;

fn mount_header(slot: &HeaderMount) -> bool {
    if slot.is_mounted() {
        log::trace!("User header already mounted");
        return false;
    }

    let mounted = slot.mount_with(|| {
        let root = create_root()?;
        let handle = yew::Renderer::<UserHeader>::with_root(root.clone()).render();
        Some((handle, root))
    });
    if mounted {
        log::info!("User header mounted");
    } else {
        log::debug!("No container for the user header");
    }
    mounted
}

/// Tears the header down, stopping its poller, so the next page can mount a
/// fresh one.
fn unmount_header(slot: &HeaderMount) -> bool {
    let Some((handle, root)) = slot.release() else {
        return false;
    };
    handle.destroy();
    root.remove();
    log::info!("User header unmounted");
    true
}

fn create_root() -> Option<Element> {
    let document = window()?.document()?;
    let container = HEADER_CONTAINERS
        .iter()
        .find_map(|selector| document.query_selector(selector).ok().flatten())?;

    let root = document.create_element("div").ok()?;
    root.set_id(MOUNT_ID);
    if let Err(e) = container.insert_before(&root, container.first_child().as_ref()) {
        log::error!("Failed to attach the user header: {:?}", e);
        return None;
    }
    Some(root)
}

thread_local! {
    static HEADER_MOUNT: HeaderMount = HeaderMount::default();
}

/// Renders the user header into the page. Returns whether this call mounted
/// it; calls while a header is mounted do nothing.
#[wasm_bindgen]
pub fn mount_user_header() -> bool {
    HEADER_MOUNT.with(mount_header)
}

/// Removes a header mounted by [`mount_user_header`]. Returns whether one
/// was mounted.
#[wasm_bindgen]
pub fn unmount_user_header() -> bool {
    HEADER_MOUNT.with(unmount_header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_second_mount_is_a_no_op() {
        let slot = MountSlot::default();
        let created = Cell::new(0);
        let create = || {
            created.set(created.get() + 1);
            Some("header")
        };

        assert!(slot.mount_with(create));
        assert!(!slot.mount_with(create));
        assert_eq!(created.get(), 1);
    }

    #[test]
    fn test_release_allows_remount() {
        let slot = MountSlot::default();
        assert!(slot.mount_with(|| Some(1)));
        assert_eq!(slot.release(), Some(1));
        assert!(!slot.is_mounted());
        assert_eq!(slot.release(), None);

        assert!(slot.mount_with(|| Some(2)));
        assert_eq!(slot.release(), Some(2));
    }

    #[test]
    fn test_missing_container_leaves_slot_empty() {
        let slot: MountSlot<u8> = MountSlot::default();
        assert!(!slot.mount_with(|| None));
        assert!(!slot.is_mounted());
        assert!(slot.mount_with(|| Some(7)));
    }
}
