//! Conformance tests: realistic programs that must parse without
//! diagnostics, exercising the grammar broadly.

use bumpalo::Bump;
use sscript_compiler::Compiler;

fn assert_parses_clean(source: &str) {
    let arena = Bump::new();
    let mut compiler = Compiler::new(&arena);
    compiler.parse_file(source, "conformance.ts", true);
    assert!(
        compiler.diagnostics().is_empty(),
        "diagnostics: {:?}",
        compiler.diagnostics().diagnostics()
    );
}

#[test]
fn fibonacci_module() {
    assert_parses_clean(
        r#"
        export function fib(n: i32): i32 {
            if (n < 2) return n;
            let a: i32 = 0, b: i32 = 1;
            for (let i: i32 = 2; i <= n; ++i) {
                let t: i32 = a + b;
                a = b;
                b = t;
            }
            return b;
        }
        "#,
    );
}

#[test]
fn class_hierarchy() {
    assert_parses_clean(
        r#"
        abstract class Shape {
            name: string = "shape";
            abstract area(): f64;
            describe(): string {
                return this.name;
            }
        }

        class Circle extends Shape implements Measurable {
            radius: f64 = 0.0;
            static unit: Circle | null = null;
            area(): f64 {
                return 3.141592653589793 * this.radius ** 2;
            }
            get diameter(): f64 { return this.radius * 2.0; }
        }
        "#,
    );
}

#[test]
fn enums_and_switches() {
    assert_parses_clean(
        r#"
        const enum Opcode {
            Nop = 0x00,
            Push = 0x01,
            Pop,
            Add = Push + 0x10,
        }

        function step(op: i32, stack: i32[]): void {
            switch (op) {
                case 0:
                    break;
                case 1:
                case 2:
                    stack[0] = stack[0] + 1;
                    break;
                default:
                    throw new Error("bad opcode");
            }
        }
        "#,
    );
}

#[test]
fn generics_and_assertions() {
    assert_parses_clean(
        r#"
        function max<T>(a: T, b: T): T {
            return a > b ? a : b;
        }

        let ints: Array<i32> = [1, 2, 3];
        let head: i32 = ints[0];
        let widened: i64 = <i64>head;
        let narrowed: i32 = widened as i32;
        let picked: i32 = max<i32>(head, narrowed);
        "#,
    );
}

#[test]
fn ambient_declarations() {
    assert_parses_clean(
        r#"
        declare function host_log(level: i32, message: string): void;
        declare const HOST_VERSION: i32;

        export function log(message: string): void {
            host_log(0, message);
        }
        "#,
    );
}

#[test]
fn operators_and_literals() {
    assert_parses_clean(
        r#"
        let mask: i32 = (0xFF << 8) | 0b1010_1010;
        let shifted: i32 = mask >>> 2;
        let mixed: f64 = 1.5e3 + .25;
        let text: string = "tab\tnewline\nquote\"";
        let pattern = /ab+[c/]/gi;
        let choice: i32 = mask != 0 ? mask & 0x0F : ~mask;
        mask <<= 1;
        mask **= 2;
        "#,
    );
}

#[test]
fn try_and_loops() {
    assert_parses_clean(
        r#"
        function drain(queue: Queue | null): i32 {
            let count: i32 = 0;
            try {
                do {
                    count++;
                } while (queue.pop());
                while (true) {
                    if (count > 100) break;
                    continue;
                }
            } catch (e) {
                count = -1;
            } finally {
                queue.close();
            }
            return count;
        }
        "#,
    );
}

#[test]
fn module_surface() {
    assert_parses_clean(
        r#"
        import { Reader, Writer as W } from "./io";
        export { Reader, W as Writer };
        export import Default = Reader;
        export const VERSION: i32 = 3;
        "#,
    );
}
