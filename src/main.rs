// This binary crate is intentionally minimal.
// All classifier logic lives in the library (src/lib.rs and its modules).
// Run the demo with:
//   cargo run --example weighted_blobs
fn main() {
    println!("sift-nn: a weighted binary classifier in plain Rust.");
    println!("Run `cargo run --example weighted_blobs` to see the demo.");
}
