//! Built-in instruction set.
//!
//! Every instruction checks its operands before touching a stack and does
//! nothing when they are missing. Binary operators compute `op(second, top)`.

use crate::interpreter::Interpreter;
use crate::registry::{Instruction, InstructionSet};
use crate::stacks::{StackKind, StackSet};
use psh_core::{Result, Stack, StackOps};
use psh_ir::{Atom, Program};

type Select<T> = fn(&mut StackSet) -> &mut Stack<T>;
type AtomStack = fn(&mut Interpreter) -> &mut Stack<Atom>;

fn ints(stacks: &mut StackSet) -> &mut Stack<i32> {
    &mut stacks.integer
}

fn floats(stacks: &mut StackSet) -> &mut Stack<f32> {
    &mut stacks.float
}

fn bools(stacks: &mut StackSet) -> &mut Stack<bool> {
    &mut stacks.boolean
}

fn codes(stacks: &mut StackSet) -> &mut Stack<Atom> {
    &mut stacks.code
}

fn code_stack(interpreter: &mut Interpreter) -> &mut Stack<Atom> {
    &mut interpreter.stacks_mut().code
}

fn exec_stack(interpreter: &mut Interpreter) -> &mut Stack<Atom> {
    interpreter.exec_stack_mut()
}

/// Define every built-in instruction in `set`
pub fn register_builtins(set: &mut InstructionSet) {
    register_integer(set);
    register_float(set);
    register_boolean(set);
    register_code(set);
    register_exec(set);
    register_input(set);

    for kind in StackKind::MANIPULABLE {
        register_stack_ops(set, kind);
    }

    set.define("frame.push", |interpreter: &mut Interpreter| -> Result<()> {
        interpreter.push_frame();
        Ok(())
    });
    set.define("frame.pop", |interpreter: &mut Interpreter| -> Result<()> {
        interpreter.pop_frame();
        Ok(())
    });
}

fn binary<T: 'static, R: 'static>(from: Select<T>, to: Select<R>, op: fn(T, T) -> R) -> impl Instruction {
    move |interpreter: &mut Interpreter| -> Result<()> {
        let stacks = interpreter.stacks_mut();
        if from(stacks).depth() < 2 {
            return Ok(());
        }
        let top = from(stacks).pop()?;
        let second = from(stacks).pop()?;
        to(stacks).push(op(second, top));
        Ok(())
    }
}

fn unary<T: 'static, R: 'static>(from: Select<T>, to: Select<R>, op: fn(T) -> R) -> impl Instruction {
    move |interpreter: &mut Interpreter| -> Result<()> {
        let stacks = interpreter.stacks_mut();
        if from(stacks).is_empty() {
            return Ok(());
        }
        let value = from(stacks).pop()?;
        to(stacks).push(op(value));
        Ok(())
    }
}

fn register_integer(set: &mut InstructionSet) {
    set.define("integer.+", binary(ints, ints, i32::wrapping_add));
    set.define("integer.-", binary(ints, ints, i32::wrapping_sub));
    set.define("integer.*", binary(ints, ints, i32::wrapping_mul));
    set.define(
        "integer./",
        binary(ints, ints, |a, b| if b == 0 { 0 } else { a.wrapping_div(b) }),
    );
    set.define(
        "integer.%",
        binary(ints, ints, |a, b| if b == 0 { 0 } else { a.wrapping_rem(b) }),
    );
    set.define(
        "integer.pow",
        binary(ints, ints, |a, b| (a as f64).powf(b as f64) as i32),
    );
    set.define(
        "integer.log",
        binary(ints, ints, |a, b| ((a as f64).ln() / (b as f64).ln()) as i32),
    );
    set.define("integer.=", binary(ints, bools, |a, b| a == b));
    set.define("integer.>", binary(ints, bools, |a, b| a > b));
    set.define("integer.<", binary(ints, bools, |a, b| a < b));
    set.define("integer.min", binary(ints, ints, |a, b| a.min(b)));
    set.define("integer.max", binary(ints, ints, |a, b| a.max(b)));
    set.define("integer.abs", unary(ints, ints, i32::wrapping_abs));
    set.define("integer.neg", unary(ints, ints, i32::wrapping_neg));
    set.define("integer.ln", unary(ints, ints, |a| (a as f64).ln() as i32));
    set.define("integer.fromfloat", unary(floats, ints, |f| f as i32));
    set.define("integer.fromboolean", unary(bools, ints, i32::from));
    set.define("integer.rand", |interpreter: &mut Interpreter| -> Result<()> {
        let value = interpreter.rand_integer();
        interpreter.stacks_mut().integer.push(value);
        Ok(())
    });
}

fn register_float(set: &mut InstructionSet) {
    set.define("float.+", binary(floats, floats, |a, b| a + b));
    set.define("float.-", binary(floats, floats, |a, b| a - b));
    set.define("float.*", binary(floats, floats, |a, b| a * b));
    set.define(
        "float./",
        binary(floats, floats, |a, b| if b == 0.0 { 0.0 } else { a / b }),
    );
    set.define(
        "float.%",
        binary(floats, floats, |a, b| if b == 0.0 { 0.0 } else { a % b }),
    );
    set.define("float.pow", binary(floats, floats, f32::powf));
    set.define("float.log", binary(floats, floats, |a, b| a.ln() / b.ln()));
    set.define("float.=", binary(floats, bools, |a, b| a == b));
    set.define("float.>", binary(floats, bools, |a, b| a > b));
    set.define("float.<", binary(floats, bools, |a, b| a < b));
    set.define("float.min", binary(floats, floats, f32::min));
    set.define("float.max", binary(floats, floats, f32::max));
    set.define("float.sin", unary(floats, floats, f32::sin));
    set.define("float.cos", unary(floats, floats, f32::cos));
    set.define("float.tan", unary(floats, floats, f32::tan));
    set.define("float.exp", unary(floats, floats, f32::exp));
    set.define("float.abs", unary(floats, floats, f32::abs));
    set.define("float.neg", unary(floats, floats, |a| -a));
    set.define("float.ln", unary(floats, floats, f32::ln));
    set.define("float.frominteger", unary(ints, floats, |i| i as f32));
    set.define(
        "float.fromboolean",
        unary(bools, floats, |b| if b { 1.0 } else { 0.0 }),
    );
    set.define("float.rand", |interpreter: &mut Interpreter| -> Result<()> {
        let value = interpreter.rand_float();
        interpreter.stacks_mut().float.push(value);
        Ok(())
    });
}

fn register_boolean(set: &mut InstructionSet) {
    set.define("boolean.=", binary(bools, bools, |a, b| a == b));
    set.define("boolean.not", unary(bools, bools, |a| !a));
    set.define("boolean.and", binary(bools, bools, |a, b| a && b));
    set.define("boolean.or", binary(bools, bools, |a, b| a || b));
    set.define("boolean.xor", binary(bools, bools, |a, b| a ^ b));
    set.define("boolean.frominteger", unary(ints, bools, |i| i != 0));
    set.define("boolean.fromfloat", unary(floats, bools, |f| f != 0.0));
    set.define("boolean.rand", |interpreter: &mut Interpreter| -> Result<()> {
        let value = interpreter.rand_boolean();
        interpreter.stacks_mut().boolean.push(value);
        Ok(())
    });
}

fn noop(_: &mut Interpreter) -> Result<()> {
    Ok(())
}

fn register_code(set: &mut InstructionSet) {
    set.define("code.quote", |interpreter: &mut Interpreter| -> Result<()> {
        if let Ok(atom) = interpreter.exec_stack_mut().pop() {
            interpreter.stacks_mut().code.push(atom);
        }
        Ok(())
    });
    set.define("code.fromboolean", unary(bools, codes, Atom::Boolean));
    set.define("code.frominteger", unary(ints, codes, Atom::Integer));
    set.define("code.fromfloat", unary(floats, codes, Atom::Float));
    set.define("code.noop", noop);
    set.define("code.=", binary(codes, bools, |a, b| a == b));
    set.define("code.if", choose(code_stack));
    set.define("code.rand", random_push_code(code_stack));
    set.define("code.do*range", code_do_range);
    set.define("code.do*count", code_do_count(false));
    set.define("code.do*times", code_do_count(true));
}

fn register_exec(set: &mut InstructionSet) {
    set.define("exec.k", exec_k);
    set.define("exec.s", exec_s);
    set.define("exec.y", exec_y);
    set.define("exec.noop", noop);
    set.define("exec.=", |interpreter: &mut Interpreter| -> Result<()> {
        if interpreter.exec_stack().depth() < 2 {
            return Ok(());
        }
        let top = interpreter.exec_stack_mut().pop()?;
        let second = interpreter.exec_stack_mut().pop()?;
        interpreter.stacks_mut().boolean.push(second == top);
        Ok(())
    });
    set.define("exec.if", choose(exec_stack));
    set.define("exec.rand", random_push_code(exec_stack));
    set.define("exec.do*range", exec_do_range);
    set.define("exec.do*count", exec_do_count(false));
    set.define("exec.do*times", exec_do_count(true));
}

/// Pop a boolean and two items of `stack`; the top item is executed when the
/// boolean is true, the second otherwise
fn choose(stack: AtomStack) -> impl Instruction {
    move |interpreter: &mut Interpreter| -> Result<()> {
        if interpreter.stacks().boolean.is_empty() || stack(interpreter).depth() < 2 {
            return Ok(());
        }
        let condition = interpreter.stacks_mut().boolean.pop()?;
        let if_true = stack(interpreter).pop()?;
        let if_false = stack(interpreter).pop()?;
        interpreter
            .exec_stack_mut()
            .push(if condition { if_true } else { if_false });
        Ok(())
    }
}

/// Pop a size bound from the integer stack and push random code onto `stack`
fn random_push_code(stack: AtomStack) -> impl Instruction {
    move |interpreter: &mut Interpreter| -> Result<()> {
        if interpreter.stacks().integer.is_empty() || interpreter.instructions().eligible().is_empty() {
            return Ok(());
        }
        let requested = interpreter.stacks_mut().integer.pop()?;
        let limit = (requested.unsigned_abs() as usize).min(interpreter.config().max_random_code_size);
        let size = if limit > 0 {
            interpreter.rand_below(limit) + 2
        } else {
            2
        };
        let code = interpreter.rand_code(size)?;
        stack(interpreter).push(Atom::Program(code));
        Ok(())
    }
}

/// `(A B ...)` becomes `(A ...)`
fn exec_k(interpreter: &mut Interpreter) -> Result<()> {
    let exec = interpreter.exec_stack_mut();
    if exec.depth() < 2 {
        return Ok(());
    }
    let keep = exec.pop()?;
    exec.pop()?;
    exec.push(keep);
    Ok(())
}

/// `(A B C ...)` becomes `(A C (B C) ...)`, unless `(B C)` would exceed the
/// program size limit
fn exec_s(interpreter: &mut Interpreter) -> Result<()> {
    let max_points = interpreter.config().max_points_in_program;
    let exec = interpreter.exec_stack_mut();
    let (Some(b), Some(c)) = (exec.peek(1), exec.peek(2)) else {
        return Ok(());
    };
    if b.points() + c.points() > max_points {
        return Ok(());
    }
    let a = exec.pop()?;
    let b = exec.pop()?;
    let c = exec.pop()?;
    exec.push(Atom::Program(Program::from_atoms(vec![b, c.clone()])));
    exec.push(c);
    exec.push(a);
    Ok(())
}

/// `(A ...)` becomes `(A (exec.y A) ...)`
fn exec_y(interpreter: &mut Interpreter) -> Result<()> {
    let exec = interpreter.exec_stack_mut();
    let Ok(body) = exec.pop() else {
        return Ok(());
    };
    exec.push(Atom::Program(Program::from_atoms(vec![
        Atom::name("exec.y"),
        body.clone(),
    ])));
    exec.push(body);
    Ok(())
}

/// Pop the destination (top) and current index from the integer stack.
/// Returns the current index and, unless the loop is finished, the next one.
fn range_step(stacks: &mut StackSet) -> Result<(i32, Option<i32>)> {
    let destination = stacks.integer.pop()?;
    let current = stacks.integer.pop()?;
    let next = match current.cmp(&destination) {
        std::cmp::Ordering::Less => Some(current + 1),
        std::cmp::Ordering::Greater => Some(current - 1),
        std::cmp::Ordering::Equal => None,
    };
    stacks.integer.push(current);
    Ok((destination, next))
}

fn exec_do_range(interpreter: &mut Interpreter) -> Result<()> {
    if interpreter.stacks().integer.depth() < 2 || interpreter.exec_stack().is_empty() {
        return Ok(());
    }
    let body = interpreter.exec_stack_mut().pop()?;
    let (destination, next) = range_step(interpreter.stacks_mut())?;
    let exec = interpreter.exec_stack_mut();
    if let Some(next) = next {
        exec.push(Atom::Program(Program::from_atoms(vec![
            Atom::Integer(next),
            Atom::Integer(destination),
            Atom::name("exec.do*range"),
            body.clone(),
        ])));
    }
    exec.push(body);
    Ok(())
}

fn code_do_range(interpreter: &mut Interpreter) -> Result<()> {
    let stacks = interpreter.stacks();
    if stacks.integer.depth() < 2 || stacks.code.is_empty() {
        return Ok(());
    }
    let body = interpreter.stacks_mut().code.pop()?;
    let (destination, next) = range_step(interpreter.stacks_mut())?;
    let exec = interpreter.exec_stack_mut();
    if let Some(next) = next {
        exec.push(Atom::Program(Program::from_atoms(vec![
            Atom::Integer(next),
            Atom::Integer(destination),
            Atom::name("code.quote"),
            body.clone(),
            Atom::name("code.do*range"),
        ])));
    }
    exec.push(body);
    Ok(())
}

/// Loop body for the `do*times` variants, which drop the loop index
fn times_body(body: Atom) -> Atom {
    Atom::Program(Program::from_atoms(vec![Atom::name("integer.pop"), body]))
}

/// Pop a positive count and run the next exec item that many times
fn exec_do_count(discard_index: bool) -> impl Instruction {
    move |interpreter: &mut Interpreter| -> Result<()> {
        let count = match interpreter.stacks().integer.top() {
            Some(&count) if count > 0 && !interpreter.exec_stack().is_empty() => count,
            _ => return Ok(()),
        };
        interpreter.stacks_mut().integer.pop()?;
        let mut body = interpreter.exec_stack_mut().pop()?;
        if discard_index {
            body = times_body(body);
        }
        interpreter.exec_stack_mut().push(Atom::Program(Program::from_atoms(vec![
            Atom::Integer(0),
            Atom::Integer(count - 1),
            Atom::name("exec.do*range"),
            body,
        ])));
        Ok(())
    }
}

/// Pop a positive count and run the top code item that many times
fn code_do_count(discard_index: bool) -> impl Instruction {
    move |interpreter: &mut Interpreter| -> Result<()> {
        let stacks = interpreter.stacks();
        let count = match stacks.integer.top() {
            Some(&count) if count > 0 && !stacks.code.is_empty() => count,
            _ => return Ok(()),
        };
        let stacks = interpreter.stacks_mut();
        stacks.integer.pop()?;
        let mut body = stacks.code.pop()?;
        if discard_index {
            body = times_body(body);
        }
        interpreter.exec_stack_mut().push(Atom::Program(Program::from_atoms(vec![
            Atom::Integer(0),
            Atom::Integer(count - 1),
            Atom::name("code.quote"),
            body,
            Atom::name("code.do*range"),
        ])));
        Ok(())
    }
}

/// Push an input value onto the stack matching its type
fn push_value(interpreter: &mut Interpreter, value: Atom) {
    let stacks = interpreter.stacks_mut();
    match value {
        Atom::Integer(v) => stacks.integer.push(v),
        Atom::Float(v) => stacks.float.push(v),
        Atom::Boolean(v) => stacks.boolean.push(v),
        Atom::Name(name) => stacks.name.push(name),
        program @ Atom::Program(_) => stacks.code.push(program),
    }
}

/// Instruction pushing the input at `index`, counted from the bottom
pub fn input_in(index: usize) -> impl Instruction {
    move |interpreter: &mut Interpreter| -> Result<()> {
        if let Some(value) = interpreter.input_stack().get(index).cloned() {
            push_value(interpreter, value);
        }
        Ok(())
    }
}

fn register_input(set: &mut InstructionSet) {
    set.define("input.index", |interpreter: &mut Interpreter| -> Result<()> {
        let depth = interpreter.input_stack().depth();
        if depth == 0 || interpreter.stacks().integer.is_empty() {
            return Ok(());
        }
        let index = interpreter.stacks_mut().integer.pop()?;
        let index = (index.max(0) as usize).min(depth - 1);
        if let Some(value) = interpreter.input_stack().get(index).cloned() {
            push_value(interpreter, value);
        }
        Ok(())
    });
    set.define("input.inall", |interpreter: &mut Interpreter| -> Result<()> {
        let values: Vec<Atom> = interpreter.input_stack().iter().cloned().collect();
        for value in values {
            push_value(interpreter, value);
        }
        Ok(())
    });
    set.define("input.inallrev", |interpreter: &mut Interpreter| -> Result<()> {
        let values: Vec<Atom> = interpreter.input_stack().iter().rev().cloned().collect();
        for value in values {
            push_value(interpreter, value);
        }
        Ok(())
    });
    set.define("input.stackdepth", |interpreter: &mut Interpreter| -> Result<()> {
        let depth = interpreter.input_stack().depth() as i32;
        interpreter.stacks_mut().integer.push(depth);
        Ok(())
    });
}

/// Pop a depth from the integer stack, then apply `op` to the `kind` stack
fn with_depth(kind: StackKind, op: fn(&mut dyn StackOps, usize)) -> impl Instruction {
    move |interpreter: &mut Interpreter| -> Result<()> {
        if interpreter.stacks().integer.is_empty() || interpreter.stack_ops(kind).depth() == 0 {
            return Ok(());
        }
        let depth = interpreter.stacks_mut().integer.pop()?.max(0) as usize;
        op(interpreter.stack_ops(kind), depth);
        Ok(())
    }
}

fn simple(kind: StackKind, op: fn(&mut dyn StackOps)) -> impl Instruction {
    move |interpreter: &mut Interpreter| -> Result<()> {
        op(interpreter.stack_ops(kind));
        Ok(())
    }
}

/// `pop swap rot flush dup stackdepth shove yank yankdup` for one stack
fn register_stack_ops(set: &mut InstructionSet, kind: StackKind) {
    let name = |op: &str| format!("{}.{}", kind.prefix(), op);

    set.define(&name("pop"), simple(kind, |ops| ops.discard()));
    set.define(&name("swap"), simple(kind, |ops| ops.swap()));
    set.define(&name("rot"), simple(kind, |ops| ops.rot()));
    set.define(&name("flush"), simple(kind, |ops| ops.flush()));
    set.define(&name("dup"), simple(kind, |ops| ops.dup()));
    set.define(
        &name("stackdepth"),
        move |interpreter: &mut Interpreter| -> Result<()> {
            let depth = interpreter.stack_ops(kind).depth() as i32;
            interpreter.stacks_mut().integer.push(depth);
            Ok(())
        },
    );
    set.define(&name("shove"), with_depth(kind, |ops, depth| ops.shove(depth)));
    set.define(&name("yank"), with_depth(kind, |ops, depth| ops.yank(depth)));
    set.define(&name("yankdup"), with_depth(kind, |ops, depth| ops.yank_dup(depth)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use psh_core::PushConfig;
    use psh_ir::parse_program;

    fn run(text: &str) -> Interpreter {
        run_with(PushConfig::default(), text)
    }

    fn run_with(config: PushConfig, text: &str) -> Interpreter {
        let mut interpreter = Interpreter::new(config);
        let program = parse_program(text).unwrap();
        interpreter.execute(&program, 1000).unwrap();
        interpreter
    }

    fn ints_of(interpreter: &Interpreter) -> Vec<i32> {
        interpreter.stacks().integer.iter().copied().collect()
    }

    fn floats_of(interpreter: &Interpreter) -> Vec<f32> {
        interpreter.stacks().float.iter().copied().collect()
    }

    fn bools_of(interpreter: &Interpreter) -> Vec<bool> {
        interpreter.stacks().boolean.iter().copied().collect()
    }

    #[test]
    fn test_integer_arithmetic() {
        assert_eq!(ints_of(&run("( 7 3 integer.- )")), vec![4]);
        assert_eq!(ints_of(&run("( 7 2 integer./ )")), vec![3]);
        assert_eq!(ints_of(&run("( 7 0 integer./ )")), vec![0]);
        assert_eq!(ints_of(&run("( -7 3 integer.% )")), vec![-1]);
        assert_eq!(ints_of(&run("( 2 10 integer.pow )")), vec![1024]);
        assert_eq!(ints_of(&run("( 2147483647 1 integer.+ )")), vec![i32::MIN]);
        assert_eq!(ints_of(&run("( 4 -9 integer.min -3 integer.abs )")), vec![-9, 3]);
    }

    #[test]
    fn test_missing_operands_are_noops() {
        let interpreter = run("( 5 integer.+ integer.- float.* boolean.and )");
        assert_eq!(ints_of(&interpreter), vec![5]);
        assert!(interpreter.stacks().float.is_empty());
    }

    #[test]
    fn test_comparisons_push_booleans() {
        let interpreter = run("( 2 3 integer.< 2.5 1.0 float.> 4 4 integer.= )");
        assert_eq!(bools_of(&interpreter), vec![true, true, true]);
        assert!(ints_of(&interpreter).is_empty());
    }

    #[test]
    fn test_float_ops() {
        let interpreter = run("( 1.5 2.0 float.* 0.0 float.sin 3.0 0.0 float./ )");
        assert_eq!(floats_of(&interpreter), vec![3.0, 0.0, 0.0]);
        let interpreter = run("( 3 float.frominteger true float.fromboolean )");
        assert_eq!(floats_of(&interpreter), vec![3.0, 1.0]);
    }

    #[test]
    fn test_boolean_ops() {
        let interpreter = run("( true false boolean.or true boolean.xor 0 boolean.frominteger )");
        assert_eq!(bools_of(&interpreter), vec![false, false]);
    }

    #[test]
    fn test_code_quote_and_if() {
        // quote pushes ( 1 ) then ( 2 ); the condition picks the top item
        let interpreter = run("( code.quote ( 1 ) code.quote ( 2 ) true code.if )");
        assert_eq!(ints_of(&interpreter), vec![2]);
        let interpreter = run("( code.quote ( 1 ) code.quote ( 2 ) false code.if )");
        assert_eq!(ints_of(&interpreter), vec![1]);
    }

    #[test]
    fn test_exec_if() {
        assert_eq!(ints_of(&run("( true exec.if 1 2 )")), vec![1]);
        assert_eq!(ints_of(&run("( false exec.if 1 2 )")), vec![2]);
    }

    #[test]
    fn test_exec_k() {
        assert_eq!(ints_of(&run("( exec.k 1 2 3 )")), vec![1, 3]);
    }

    #[test]
    fn test_exec_s() {
        // (A B C) -> A C (B C)
        let interpreter = run("( exec.s 1 2 3 )");
        assert_eq!(ints_of(&interpreter), vec![1, 3, 2, 3]);
    }

    #[test]
    fn test_exec_s_respects_size_limit() {
        let config = PushConfig {
            max_points_in_program: 3,
            ..Default::default()
        };
        let interpreter = run_with(config, "( exec.s 1 ( 2 2 ) 3 )");
        // the combinator is skipped and the items run in order
        assert_eq!(ints_of(&interpreter), vec![1, 2, 2, 3]);
    }

    #[test]
    fn test_exec_y_is_bounded_by_steps() {
        let mut interpreter = Interpreter::new(PushConfig::default());
        let program = parse_program("( exec.y ( 1 ) )").unwrap();
        let steps = interpreter.execute(&program, 50).unwrap();
        assert_eq!(steps, 50);
        assert!(interpreter.stacks().integer.depth() > 5);
    }

    #[test]
    fn test_exec_do_range() {
        assert_eq!(ints_of(&run("( 1 4 exec.do*range ( ) )")), vec![1, 2, 3, 4]);
        assert_eq!(ints_of(&run("( 3 1 exec.do*range ( ) )")), vec![3, 2, 1]);
    }

    #[test]
    fn test_exec_do_count_and_times() {
        assert_eq!(ints_of(&run("( 3 exec.do*count ( ) )")), vec![0, 1, 2]);
        assert_eq!(ints_of(&run("( 3 exec.do*times 7 )")), vec![7, 7, 7]);
        // non-positive counts leave everything in place
        assert_eq!(ints_of(&run("( 0 exec.do*count 5 )")), vec![0, 5]);
    }

    #[test]
    fn test_code_do_variants() {
        assert_eq!(ints_of(&run("( code.quote ( ) 2 5 code.do*range )")), vec![2, 3, 4, 5]);
        assert_eq!(ints_of(&run("( code.quote 9 2 code.do*times )")), vec![9, 9]);
        assert_eq!(ints_of(&run("( code.quote ( ) 2 code.do*count )")), vec![0, 1]);
    }

    #[test]
    fn test_code_and_exec_equality() {
        let interpreter = run("( code.quote ( 1 2 ) code.quote ( 1 2 ) code.= exec.= 3 4 )");
        assert_eq!(bools_of(&interpreter), vec![true, false]);
    }

    #[test]
    fn test_code_from_literals() {
        let interpreter = run("( 4 code.frominteger true code.fromboolean )");
        let code: Vec<Atom> = interpreter.stacks().code.iter().skip(1).cloned().collect();
        assert_eq!(code, vec![Atom::Integer(4), Atom::Boolean(true)]);
    }

    #[test]
    fn test_stack_family() {
        assert_eq!(ints_of(&run("( 1 2 3 integer.rot )")), vec![2, 3, 1]);
        assert_eq!(ints_of(&run("( 1 2 integer.swap integer.dup )")), vec![2, 1, 1]);
        assert_eq!(ints_of(&run("( 1 2 3 integer.flush 4 )")), vec![4]);
        assert_eq!(ints_of(&run("( 1.0 2.0 float.stackdepth )")), vec![2]);
        assert_eq!(floats_of(&run("( 1.0 2.0 3.0 2 float.yank )")), vec![2.0, 3.0, 1.0]);
        assert_eq!(floats_of(&run("( 1.0 2.0 3.0 5 float.shove )")), vec![3.0, 1.0, 2.0]);
        assert_eq!(bools_of(&run("( true false 1 boolean.yankdup )")), vec![true, false, true]);
    }

    #[test]
    fn test_integer_yank_pops_depth_first() {
        // depth argument 2 is popped, leaving 10 20 30 with 10 at depth 2
        assert_eq!(ints_of(&run("( 10 20 30 2 integer.yank )")), vec![20, 30, 10]);
    }

    #[test]
    fn test_name_stack() {
        let interpreter = run("( foo bar name.swap name.dup )");
        let names: Vec<&str> = interpreter.stacks().name.iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["bar", "foo", "foo"]);
    }

    #[test]
    fn test_exec_stack_ops() {
        assert_eq!(ints_of(&run("( exec.pop 1 2 )")), vec![2]);
        assert_eq!(ints_of(&run("( exec.dup 5 )")), vec![5, 5]);
        assert_eq!(ints_of(&run("( exec.swap 1 2 )")), vec![2, 1]);
    }

    #[test]
    fn test_input_instructions() {
        let mut interpreter = Interpreter::new(PushConfig::default());
        interpreter.input_stack_mut().extend([
            Atom::Integer(7),
            Atom::Float(1.5),
            Atom::Boolean(true),
        ]);
        interpreter
            .execute(&parse_program("( input.inall 1 input.index input.stackdepth )").unwrap(), 100)
            .unwrap();
        assert_eq!(ints_of(&interpreter), vec![7, 3]);
        assert_eq!(floats_of(&interpreter), vec![1.5, 1.5]);
        assert_eq!(bools_of(&interpreter), vec![true]);

        interpreter.clear_stacks();
        interpreter.input_stack_mut().extend([Atom::Integer(1), Atom::Integer(2)]);
        interpreter
            .execute(&parse_program("( input.inallrev -4 input.index )").unwrap(), 100)
            .unwrap();
        assert_eq!(ints_of(&interpreter), vec![2, 1, 1]);
    }

    #[test]
    fn test_input_in_n() {
        let mut interpreter = Interpreter::new(PushConfig::default());
        interpreter
            .set_instructions(&parse_program("( input.makeinputs2 )").unwrap())
            .unwrap();
        interpreter.input_stack_mut().extend([Atom::Float(0.5), Atom::Integer(3)]);
        interpreter
            .execute(&parse_program("( input.in1 input.in0 input.in5 )").unwrap(), 100)
            .unwrap();
        assert_eq!(ints_of(&interpreter), vec![3]);
        assert_eq!(floats_of(&interpreter), vec![0.5]);
    }

    #[test]
    fn test_rand_instructions() {
        let mut interpreter = Interpreter::with_seed(PushConfig::default(), 7);
        interpreter
            .set_instructions(&parse_program("( integer.+ integer.erc )").unwrap())
            .unwrap();
        interpreter
            .execute(
                &parse_program("( integer.rand float.rand boolean.rand 5 code.rand 3 exec.rand )").unwrap(),
                4,
            )
            .unwrap();
        let value = interpreter.stacks().integer.top().copied().unwrap();
        assert!((-10..10).contains(&value));
        let f = interpreter.stacks().float.top().copied().unwrap();
        assert!((-10.0..10.0).contains(&f));
        assert_eq!(interpreter.stacks().boolean.depth(), 1);

        let mut interpreter = Interpreter::with_seed(PushConfig::default(), 7);
        interpreter
            .set_instructions(&parse_program("( integer.+ integer.erc )").unwrap())
            .unwrap();
        interpreter
            .execute(&parse_program("( 5 code.rand )").unwrap(), 100)
            .unwrap();
        let code = interpreter.stacks().code.top().cloned().unwrap();
        let points = code.points();
        assert!((2..=6).contains(&points));
    }

    #[test]
    fn test_code_rand_without_generators_is_noop() {
        let interpreter = run("( 5 code.rand )");
        assert_eq!(interpreter.stacks().code.depth(), 1);
        assert_eq!(ints_of(&interpreter), vec![5]);
    }
}
