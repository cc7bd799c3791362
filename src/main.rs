//! Zellij plugin entry point.
//!
//! The plugin itself lives in `shim.rs` and only builds for the Zellij wasm
//! runtime. A native build of this binary just explains that.
//!
//! # Plugin Lifecycle
//!
//! 1. **Load**: Parse config, initialize tracing, create `AppState`
//! 2. **Permissions**: Request `WebAccess`; a denial shows up in the status line
//! 3. **Subscribe**: Key, Mouse, Timer, `WebRequestResult`, Visible
//! 4. **Update**: Map Zellij events to library events, execute the returned actions
//! 5. **Render**: Print the frame produced by the library renderer
//!
//! # Keybindings
//!
//! Search page:
//! - Type: edit the query (focuses the search box)
//! - `Down`/`Ctrl+n`, `Up`/`Ctrl+p`: move through results
//! - `Enter`: open the highlighted listing
//! - `Esc`: close the result panel; again to hide the plugin
//! - `Tab`: focus or unfocus the search box
//! - Click: open a result, or focus the search box
//!
//! Detail page:
//! - `Esc`/`Backspace`/`b`: back to search
//! - `q`: hide the plugin

#![allow(clippy::multiple_crate_versions)]

#[cfg(target_family = "wasm")]
use zellij_tile::prelude::*;

#[cfg(target_family = "wasm")]
mod shim;

#[cfg(target_family = "wasm")]
use shim::State;

#[cfg(target_family = "wasm")]
register_plugin!(State);

#[cfg(not(target_family = "wasm"))]
fn main() {
    eprintln!("zlistings is a Zellij plugin: build it with `--target wasm32-wasip1` and load the .wasm from Zellij");
}
