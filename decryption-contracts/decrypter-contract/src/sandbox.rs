//! rWASM host bindings and the exported entry points.

use crate::host::{run, HostChannel};

#[link(wasm_import_module = "fluentbase_v1preview")]
extern "C" {
    fn _read(target: *mut u8, offset: u32, length: u32);
    fn _input_size() -> u32;
    fn _write(offset: *const u8, length: u32);
    fn _exit(code: i32) -> !;
}

#[derive(Default)]
pub struct RwasmHost;

impl HostChannel for RwasmHost {
    #[inline(always)]
    fn input_size(&self) -> u32 {
        unsafe { _input_size() }
    }

    #[inline(always)]
    fn read_input(&self, target: &mut [u8], offset: u32) {
        unsafe { _read(target.as_mut_ptr(), offset, target.len() as u32) }
    }

    #[inline(always)]
    fn write_output(&mut self, data: &[u8]) {
        unsafe { _write(data.as_ptr(), data.len() as u32) }
    }

    #[inline(always)]
    fn terminate(&mut self, exit_code: i32) {
        unsafe { _exit(exit_code) }
    }
}

#[no_mangle]
pub extern "C" fn deploy() {}

#[no_mangle]
pub extern "C" fn main() {
    run(&mut RwasmHost);
}
