//! ITU-T G.711 companding codecs
//!
//! A-law and mu-law are stateless 8-bit logarithmic companding schemes for
//! 16-bit audio, implemented with the reference lookup tables. Both are
//! per-sample codecs; arrays are just the sample-wise map.

pub mod alaw;
pub mod mulaw;
