mod common;

use common::{compile, run};
use simple_core::{Compilation, Phase, check};
use wasmparser::{Parser, Payload, Validator};

#[test]
fn hello_world() {
    let result = run(r#"main : i32 () { println("Hello, world!"); return 0 }"#);
    assert_eq!(result.exit_code, 0);
    assert_eq!(result.output, "Hello, world!\n");
}

#[test]
fn print_and_println_share_interned_strings() {
    let result = run(
        r#"main : i32 () {
            print("ab")
            print("ab")
            println("")
            println("done")
            return 3
        }"#,
    );
    assert_eq!(result.exit_code, 3);
    assert_eq!(result.output, "abab\ndone\n");
}

#[test]
fn arithmetic_follows_precedence() {
    assert_eq!(run("main : i32 () { return 1 + 2 * 3 }").exit_code, 7);
    assert_eq!(run("main : i32 () { return (1 + 2) * 3 }").exit_code, 9);
    assert_eq!(run("main : i32 () { return 10 - 4 - 3 }").exit_code, 3);
    assert_eq!(run("main : i32 () { return -5 + 10 }").exit_code, 5);
    assert_eq!(run("main : i32 () { return 17 / 5 * 10 + 17 % 5 }").exit_code, 32);
    assert_eq!(run("main : i32 () { return -7 / 2 }").exit_code, -3);
}

#[test]
fn bitwise_operators() {
    let result = run("main : i32 () { return (6 & 3) + (1 << 4) + (5 ^ 1) + (12 >> 2) + (8 | 1) }");
    assert_eq!(result.exit_code, 34);
}

#[test]
fn comparisons_including_negated_forms() {
    let source = "
        flag : i32 (b : bool) { b { return 1 } return 0 }
        main : i32 () {
            return flag(1 != 2) * 1
                 + flag(2 <= 2) * 2
                 + flag(3 >= 4) * 4
                 + flag(1 < 2) * 8
                 + flag(1 > 2) * 16
                 + flag(5 == 5) * 32
        }";
    assert_eq!(run(source).exit_code, 1 + 2 + 8 + 32);
}

#[test]
fn globals_are_initialized_before_main() {
    let source = "
        counter : i32 = 40
        main : i32 () { counter = counter + 2; return counter }";
    assert_eq!(run(source).exit_code, 42);
}

#[test]
fn global_initializer_may_call_later_function() {
    let source = "
        base : i32 = seed() * 2
        main : i32 () { return base + 1 }
        seed : i32 () { return 20 }";
    assert_eq!(run(source).exit_code, 41);
}

#[test]
fn global_initializer_runs_once() {
    let source = r#"
        greeting : string = announce()
        announce : string () { println("init"); return "hi" }
        main : i32 () { println(greeting); println(greeting); return 0 }"#;
    assert_eq!(run(source).output, "init\nhi\nhi\n");
}

#[test]
fn recursion_and_parameters() {
    let source = "
        factorial : i32 (n : i32) {
            n <= 1 { return 1 }
            return n * factorial(n - 1)
        }
        main : i32 () { return factorial(5) }";
    assert_eq!(run(source).exit_code, 120);
}

#[test]
fn while_loop_with_break_and_skip() {
    let source = "
        main : i32 () {
            i : i32 = 0
            total : i32 = 0
            while true {
                i = i + 1
                i > 10 { break }
                i % 2 == 0 { skip }
                total = total + i
            }
            return total
        }";
    assert_eq!(run(source).exit_code, 1 + 3 + 5 + 7 + 9);
}

#[test]
fn for_loop_skip_still_runs_increment() {
    let source = "
        main : i32 () {
            total : i32 = 0
            for (i : i32 = 0; i < 10; i = i + 1) {
                i % 2 == 0 { skip }
                total = total + i
            }
            return total
        }";
    assert_eq!(run(source).exit_code, 25);
}

#[test]
fn for_loop_without_condition_needs_break() {
    let source = "
        main : i32 () {
            n : i32 = 0
            for (;;) {
                n = n + 1
                n == 7 { break }
            }
            return n
        }";
    assert_eq!(run(source).exit_code, 7);
}

#[test]
fn nested_loops_break_the_inner_loop_only() {
    let source = "
        main : i32 () {
            count : i32 = 0
            for (i : i32 = 0; i < 3; i = i + 1) {
                j : i32 = 0
                while true {
                    j = j + 1
                    j > 4 { break }
                    count = count + 1
                }
            }
            return count
        }";
    assert_eq!(run(source).exit_code, 12);
}

#[test]
fn if_chain_picks_first_match_or_default() {
    let source = "
        classify : i32 (n : i32) {
            result : i32 = 0
            |> n < 0 { result = 1 }
            |> n == 0 { result = 2 }
            |> default { result = 3 }
            return result
        }
        main : i32 () { return classify(-4) * 100 + classify(0) * 10 + classify(9) }";
    assert_eq!(run(source).exit_code, 123);
}

#[test]
fn block_scopes_get_their_own_slots() {
    let source = "
        main : i32 () {
            x : i32 = 1
            { x : i32 = 5; x = x + 1 }
            return x
        }";
    assert_eq!(run(source).exit_code, 1);
}

#[test]
fn float_arithmetic_and_remainder() {
    let source = "
        main : i32 () {
            x : f64 = 7.5 % 2.0
            y : f64 = -x * 2.0
            x == 1.5 && y == -3.0 { return 1 }
            return 0
        }";
    assert_eq!(run(source).exit_code, 1);
}

#[test]
fn float_globals_and_returns() {
    let source = "
        scale : f64 = 2.5
        scaled : f64 (v : f64) { return v * scale }
        main : i32 () {
            scaled(4.0) >= 10.0 { return 1 }
            return 0
        }";
    assert_eq!(run(source).exit_code, 1);
}

#[test]
fn logical_operators_short_circuit() {
    let source = r#"
        noisy : bool () { println("evaluated"); return true }
        main : i32 () {
            a : bool = false && noisy()
            b : bool = true || noisy()
            c : bool = true && noisy()
            !a && b && c { return 1 }
            return 0
        }"#;
    let result = run(source);
    assert_eq!(result.exit_code, 1);
    assert_eq!(result.output, "evaluated\n");
}

#[test]
fn chars_and_bools_compare() {
    let source = "
        main : i32 () {
            c : char = 'a'
            done : bool = !false
            c == 'a' && c != 'b' && done == true { return 1 }
            return 0
        }";
    assert_eq!(run(source).exit_code, 1);
}

#[test]
fn void_functions_and_dropped_results() {
    let source = r#"
        shout : void (s : string) { print(s); print("!"); return }
        answer : i32 () { return 42 }
        main : i32 () { shout("hey"); answer(); return 0 }"#;
    let result = run(source);
    assert_eq!(result.output, "hey!");
    assert_eq!(result.exit_code, 0);
}

#[test]
fn generated_modules_validate() {
    let sources = [
        "main : i32 () { return 0 }",
        "g : f64 = 1.5\nmain : i32 () { g = g % 0.5; return 0 }",
        "main : i32 () { for (i : i32 = 0; i < 3; i = i + 1) { skip } return 1 }",
        "main : i32 () { while false { break } return 2 }",
        "main : i32 () { |> true { } |> default { return 1 } return 0 }",
        r#"main : i32 () { println("x"); return 0 }"#,
    ];
    for source in sources {
        let artifact = compile(source);
        Validator::new()
            .validate_all(&artifact.wasm)
            .unwrap_or_else(|err| panic!("invalid module for {source:?}: {err}"));
    }
}

#[test]
fn exports_main_and_memory() {
    let artifact = compile("main : i32 () { return 0 }");
    let mut exports = Vec::new();
    for payload in Parser::new(0).parse_all(&artifact.wasm) {
        if let Payload::ExportSection(reader) = payload.expect("payload") {
            for export in reader {
                exports.push(export.expect("export").name.to_string());
            }
        }
    }
    exports.sort();
    assert_eq!(exports, ["main", "memory"]);
}

#[test]
fn valid_programs_emit_or_only_miss_the_entry_point() {
    let programs = [
        "main : i32 () { return 0 }",
        "x : i32 = 10",
        "helper : void () { }",
        "main : i32 () { print(\"hi\"); return 0 }",
        "main : void () { }",
    ];
    for source in programs {
        assert!(check(source).is_empty(), "{source}");
        let result = Compilation::create(source).compile_wasm();
        if !result.success {
            let codes: Vec<_> = result.diagnostics.iter().map(|d| d.code).collect();
            assert_eq!(codes, ["EMT001"], "{source}");
        } else {
            assert!(result.artifact.is_some());
        }
    }
}

#[test]
fn loop_misuse_is_diagnosed() {
    for source in [
        "main : i32 () { break; return 0 }",
        "main : i32 () { skip; return 0 }",
        "main : i32 () { while 1 { } return 0 }",
        "main : i32 () { for (; 1; ) { } return 0 }",
    ] {
        let diagnostics = check(source);
        assert!(!diagnostics.is_empty(), "{source}");
        assert!(
            diagnostics.iter().all(|d| d.phase() == Some(Phase::Binding)),
            "{source}: {diagnostics:?}"
        );
    }
}

#[test]
fn diagnostics_arrive_in_phase_order() {
    let diagnostics = check("x : i32 = $ y\nmain : i32 () { return 0 ");
    let phases: Vec<_> = diagnostics.iter().filter_map(|d| d.phase()).collect();
    assert_eq!(
        phases,
        [Phase::Lexical, Phase::Syntactic, Phase::Binding]
    );
}
