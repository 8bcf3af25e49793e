//! Built-in schemas for KiCad 6-9 files.
//!
//! Child order in each declaration follows the order KiCad writes, so a
//! document KiCad produced encodes back to the same structure.

mod common;
mod footprint;
mod pcb;
mod schematic;
mod symbol;

use crate::registry::RegistryBuilder;

pub(crate) fn register_all(builder: &mut RegistryBuilder) {
    common::register(builder);
    symbol::register(builder);
    schematic::register(builder);
    footprint::register(builder);
    pcb::register(builder);
}
