#![allow(dead_code)]

use simple_core::{Compilation, WasmArtifact};
use wasmi::{Caller, Engine, Extern, Linker, Module, Store};

#[derive(Default)]
pub struct HostState {
    pub output: String,
}

#[derive(Debug)]
pub struct RunOutput {
    pub exit_code: i32,
    pub output: String,
}

/// Compile `source`, failing the test on any diagnostic.
pub fn compile(source: &str) -> WasmArtifact {
    let result = Compilation::create(source).compile_wasm();
    assert!(result.success, "diagnostics: {:?}", result.diagnostics);
    result.artifact.expect("successful compilation has an artifact")
}

/// Compile and run `source`, returning `main`'s result and everything
/// printed through the host functions.
pub fn run(source: &str) -> RunOutput {
    let artifact = compile(source);
    execute(&artifact.wasm)
}

pub fn execute(wasm: &[u8]) -> RunOutput {
    let engine = Engine::default();
    let module = Module::new(&engine, wasm).expect("module");
    let mut linker = Linker::<HostState>::new(&engine);
    linker
        .func_wrap("env", "print", |mut caller: Caller<'_, HostState>, ptr: i32| {
            let text = read_string(&caller, ptr);
            caller.data_mut().output.push_str(&text);
        })
        .expect("link print");
    linker
        .func_wrap("env", "println", |mut caller: Caller<'_, HostState>, ptr: i32| {
            let text = read_string(&caller, ptr);
            let output = &mut caller.data_mut().output;
            output.push_str(&text);
            output.push('\n');
        })
        .expect("link println");

    let mut store = Store::new(&engine, HostState::default());
    let instance = linker
        .instantiate_and_start(&mut store, &module)
        .expect("instantiate");
    let main = instance
        .get_typed_func::<(), i32>(&store, "main")
        .expect("typed main");
    let exit_code = main.call(&mut store, ()).expect("execute main");

    RunOutput {
        exit_code,
        output: std::mem::take(&mut store.data_mut().output),
    }
}

fn read_string(caller: &Caller<'_, HostState>, ptr: i32) -> String {
    let memory = caller
        .get_export("memory")
        .and_then(Extern::into_memory)
        .expect("exported memory");
    let mut len = [0u8; 4];
    memory
        .read(caller, ptr as usize, &mut len)
        .expect("string length");
    let mut bytes = vec![0u8; u32::from_le_bytes(len) as usize];
    memory
        .read(caller, ptr as usize + 4, &mut bytes)
        .expect("string bytes");
    String::from_utf8(bytes).expect("utf-8 string")
}
