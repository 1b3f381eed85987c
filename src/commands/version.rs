//! `cc-tools version`: print the build's semantic version.

pub fn run() -> i32 {
    println!("cc-tools {}", env!("CARGO_PKG_VERSION"));
    0
}
