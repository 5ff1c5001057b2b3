//! Notebook discovery from the live dashboard and from saved snapshots.
//!
//! - Login-aware browser capture (`capture`)
//! - Anchor-to-record derivation (`notebooks`)
//! - The stdout line protocol a supervising process reads (`protocol`)
//! - Offline snapshot extractors (`extract`)

pub mod capture;
pub mod extract;
pub mod notebooks;
pub mod protocol;
