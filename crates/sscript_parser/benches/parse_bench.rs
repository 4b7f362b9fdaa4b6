use bumpalo::Bump;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sscript_core::intern::Interner;
use sscript_parser::Parser;

// A medium-size source exercising declarations, classes, control flow,
// and expression-heavy code.
const SOURCE: &str = r#"
const enum Opcode {
    Nop = 0x00,
    Push = 0x01,
    Pop = 0x02,
    Add = 0x10,
    Mul = 0x11,
}

declare function host_trap(code: i32): void;

export class Stack {
    items: i32[] = [];
    top: i32 = 0;

    push(value: i32): void {
        this.items[this.top++] = value;
    }

    pop(): i32 {
        if (this.top == 0) {
            host_trap(1);
            return 0;
        }
        return this.items[--this.top];
    }

    get depth(): i32 { return this.top; }
}

export function interpret(code: i32[], length: i32): i32 {
    let stack: Stack = new Stack();
    for (let pc: i32 = 0; pc < length; ++pc) {
        switch (code[pc]) {
            case 0x01:
                stack.push(code[++pc]);
                break;
            case 0x02:
                stack.pop();
                break;
            case 0x10: {
                let b: i32 = stack.pop();
                let a: i32 = stack.pop();
                stack.push(a + b);
                break;
            }
            case 0x11: {
                let b: i32 = stack.pop();
                let a: i32 = stack.pop();
                stack.push(a * b);
                break;
            }
            default:
                host_trap(2);
        }
    }
    return stack.depth > 0 ? stack.pop() : 0;
}

export function checksum(data: i32[], length: i32): i32 {
    let hash: i32 = 0x811c9dc5;
    for (let i: i32 = 0; i < length; ++i) {
        hash = (hash ^ data[i]) * 0x0100_0193;
        hash = hash >>> 0;
    }
    return hash & 0x7fff_ffff;
}
"#;

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_medium_unit", |b| {
        b.iter(|| {
            let arena = Bump::new();
            let parser = Parser::new(&arena, Interner::new(), "bench", black_box(SOURCE));
            let (statements, diagnostics) = parser.parse_statements();
            black_box((statements, diagnostics));
        });
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
