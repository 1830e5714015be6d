//! Stock tools for school-feeding inventories.
//!
//! This crate provides command-line tools on top of `pae-stock-core` and
//! `pae-stock-client`:
//!
//! - `pstock-snapshot`: Show the FIFO batches currently in stock for a product
//! - `pstock-log`: Show the movement log of a product, newest first
//!
//! Both read movements either from a JSON export (`--file`) or from the
//! backend (`--api-url`, or `PAE_API_URL`).
//!
//! # Example Usage
//!
//! ```bash
//! pstock-snapshot --file movements.json --product arroz --institution 12
//! PAE_API_URL=https://pae.example/api pstock-snapshot -p arroz --format json
//! pstock-log -f movements.json -p arroz --limit 20
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
