//! Side-by-side run of `Box` and `solo` handles on the same small workloads.
//!
//! Set `RUST_LOG=trace` to watch the handles release their resources.

use solo::{make_unique, make_unique_array};

fn box_single() {
    let b = Box::new(42);
    println!("Box value: {}", b);
}

fn unique_single() {
    let p = make_unique(42);
    println!("UniquePtr value: {}", p);
}

fn box_array() {
    let mut b = vec![0; 5].into_boxed_slice();
    for (i, v) in b.iter_mut().enumerate() {
        *v = i * 10;
    }
    print!("Box<[_]> values: ");
    for v in b.iter() {
        print!("{} ", v);
    }
    println!();
}

fn unique_array() {
    let mut a = make_unique_array::<usize>(5);
    for i in 0..5 {
        a[i] = i * 10;
    }
    print!("UniqueArray values: ");
    for i in 0..5 {
        print!("{} ", a[i]);
    }
    println!();
}

fn main() {
    env_logger::init();

    println!("Testing Box:");
    box_single();

    println!("\nTesting UniquePtr:");
    unique_single();

    println!("\nTesting Box with arrays:");
    box_array();

    println!("\nTesting UniqueArray:");
    unique_array();
}
