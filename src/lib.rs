//! # imgcompare
//!
//! Near-duplicate image detection for a folder of pictures.
//!
//! Every image is reduced to a 42-value fingerprint: the seven Hu invariant
//! moments of each channel of its HSV and YCrCb representations, taken after
//! resampling to 512x512 and a light blur. Fingerprints are compared by scaled
//! Euclidean distance and grouped in a single greedy pass:
//!
//! - **Representative-anchored groups**: the first image of a group stays its
//!   reference; later images join every group whose reference is close enough
//! - **Order-dependent by construction**: the same input order always yields
//!   the same groups, a different order may not
//! - **Resilient scans**: unreadable or unsupported files are skipped and
//!   reported, never fatal
//! - **Parallel fingerprinting**: decoding and extraction run on a thread pool
//!   while grouping stays sequential
//!
//! The `cli` module is the presentation layer used by the binary; the core
//! modules do not depend on it.

pub mod cli;
pub mod common;
pub mod duplicates;
pub mod scanner;
