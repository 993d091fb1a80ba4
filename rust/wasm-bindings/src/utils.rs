// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use planlite_layout::Regeneration;

/// Set panic hook for better error messages in the browser
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Mirror dropped orientation overrides to the browser console.
#[cfg(target_arch = "wasm32")]
pub(crate) fn report_stale_overrides(regeneration: &Regeneration) {
    for stale in &regeneration.stale_overrides {
        web_sys::console::warn_1(&format!("[planlite] {}", stale).into());
    }
}

/// Native builds have no console; the kernel already logs through `tracing`.
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn report_stale_overrides(_regeneration: &Regeneration) {}
