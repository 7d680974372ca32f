use lumen_heap::Value;
use lumen_rt::Context;
use std::path::Path;

#[test]
fn runs_a_function_with_a_desugared_operator_end_to_end() {
    let mut ctx = Context::new().unwrap();
    ctx.eval_string("int add(int a, int b) { return a + b; }").unwrap();
    let result = ctx.call("add(int,int)", &[Value::Int(19), Value::Int(23)]).unwrap();
    assert_eq!(result, Some(Value::Int(42)));
}

#[test]
fn while_loop_accumulates_a_running_total() {
    let mut ctx = Context::new().unwrap();
    ctx.eval_string(
        "int sum_to(int n) { \
            int total = 0; \
            int i = 0; \
            while (i <= n) { \
                total = total + i; \
                i = i + 1; \
            } \
            return total; \
        }",
    )
    .unwrap();
    let result = ctx.call("sum_to(int)", &[Value::Int(5)]).unwrap();
    assert_eq!(result, Some(Value::Int(15)));
}

#[test]
fn if_else_picks_the_right_branch() {
    let mut ctx = Context::new().unwrap();
    ctx.eval_string(
        "int max(int a, int b) { \
            if (a > b) { return a; } else { return b; } \
        }",
    )
    .unwrap();
    assert_eq!(ctx.call("max(int,int)", &[Value::Int(3), Value::Int(9)]).unwrap(), Some(Value::Int(9)));
    assert_eq!(ctx.call("max(int,int)", &[Value::Int(9), Value::Int(3)]).unwrap(), Some(Value::Int(9)));
}

#[test]
fn struct_construction_and_field_access_round_trip() {
    let mut ctx = Context::new().unwrap();
    ctx.eval_string(
        "struct Point { int x; int y; } \
         int point_x(Point p) { return p.x; } \
         Point make_point(int x, int y) { return Point(x, y); }",
    )
    .unwrap();

    let p = ctx.call("make_point(int,int)", &[Value::Int(7), Value::Int(11)]).unwrap().unwrap();
    let x = ctx.call("point_x(Point)", &[p]).unwrap();
    assert_eq!(x, Some(Value::Int(7)));
}

#[test]
fn unknown_entry_point_is_reported() {
    let mut ctx = Context::new().unwrap();
    let err = ctx.call("nope()", &[]).unwrap_err();
    assert!(matches!(err, lumen_rt::LumenError::UnknownEntryPoint(_)));
}

#[test]
fn calling_with_the_wrong_argument_count_is_reported() {
    let mut ctx = Context::new().unwrap();
    ctx.eval_string("int double(int n) { return n * 2; }").unwrap();
    let err = ctx.call("double(int)", &[]).unwrap_err();
    assert!(matches!(err, lumen_rt::LumenError::ArityMismatch(_, 1, 0)));
}

#[test]
fn a_missing_file_is_a_silent_no_op() {
    let mut ctx = Context::new().unwrap();
    ctx.eval_file(Path::new("/no/such/script.lum")).unwrap();
}

#[test]
fn scripts_can_call_into_the_standard_builtin_modules() {
    let mut ctx = Context::new().unwrap();
    ctx.eval_string("void greet(string name) { io.WriteLine(\"hi ${name}\"); }").unwrap();
    let name = ctx.pool_mut().intern_str("world");
    let result = ctx.call("greet(string)", &[Value::Str(name)]).unwrap();
    assert_eq!(result, None);
}
