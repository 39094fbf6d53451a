mod common;
mod sanction;
