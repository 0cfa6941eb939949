use leptos::prelude::*;
use myflood_frontend::App;

// lol_alloc keeps the shipped .wasm noticeably smaller than dlmalloc; the
// browser build is single-threaded, so AssumeSingleThreaded holds.
#[cfg(target_arch = "wasm32")]
use lol_alloc::{AssumeSingleThreaded, FreeListAllocator};

#[cfg(target_arch = "wasm32")]
#[global_allocator]
static ALLOCATOR: AssumeSingleThreaded<FreeListAllocator> =
    unsafe { AssumeSingleThreaded::new(FreeListAllocator::new()) };

pub fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
