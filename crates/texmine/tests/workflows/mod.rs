use super::*;

mod download;
mod enrichment;
