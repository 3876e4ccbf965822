#![warn(clippy::pedantic)]

//! OpenHarmony SDK bootstrapper.
//!
//! Downloads the OpenHarmony SDK bundle for a platform and installs its
//! components (`native`, `toolchains`, `ets`, `js`, `previewer`) below an
//! installation prefix, one directory per declared API version:
//!
//! ```text
//! <prefix>/
//!   .ohos-sdk-version
//!   12/
//!     native/
//!     toolchains/
//! ```
//!
//! The entry point is [`sdk::OhosBootstrapper`]; the relocation pipeline alone
//! is available as [`sdk::relocate()`].

pub mod sdk;
