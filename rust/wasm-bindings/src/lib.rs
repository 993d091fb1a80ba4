// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! PlanLite WebAssembly Bindings
//!
//! JavaScript/TypeScript API for the layout kernel built with wasm-bindgen.

use wasm_bindgen::prelude::*;

mod design_api;
mod utils;

pub use design_api::DesignAPI;
pub use utils::set_panic_hook as init_panic_hook;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get the version of PlanLite
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// List the tier catalog as JSON
#[wasm_bindgen(js_name = listTiers)]
pub fn list_tiers() -> String {
    let tiers: Vec<serde_json::Value> = planlite_layout::Tier::ALL
        .iter()
        .map(|tier| {
            serde_json::json!({
                "id": tier.id(),
                "level": tier.level(),
                "storeys": tier.storeys(),
                "footprint": tier.footprint(),
                "allowsOrientation": tier.allows_orientation(),
            })
        })
        .collect();
    serde_json::to_string(&tiers).unwrap_or_else(|_| "[]".to_string())
}
