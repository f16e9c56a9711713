#[cfg(test)]
mod resolver_tests {
    use rox::ast::{Expr, ExprId, Stmt};
    use rox::error::Diagnostics;
    use rox::interpreter::Interpreter;
    use rox::parser::Parser;
    use rox::resolver::Resolver;
    use rox::scan_tokens;

    fn resolve(source: &str) -> (Vec<Stmt>, Interpreter, Vec<String>) {
        let mut diagnostics = Diagnostics::new();
        let tokens = scan_tokens(source, &mut diagnostics);
        let statements = Parser::new(&tokens).parse(&mut diagnostics);
        assert!(diagnostics.is_empty(), "syntax errors: {}", diagnostics);

        let mut interpreter = Interpreter::with_output(Box::new(std::io::sink()));
        Resolver::new(&mut interpreter).resolve(&statements, &mut diagnostics);

        let errors = diagnostics.iter().map(|e| e.to_string()).collect();
        (statements, interpreter, errors)
    }

    /// Ids of every `Variable` expression named `name`, in source order.
    fn variable_ids(statements: &[Stmt], name: &str) -> Vec<ExprId> {
        fn walk_stmt(stmt: &Stmt, name: &str, out: &mut Vec<ExprId>) {
            match stmt {
                Stmt::Expression(e) | Stmt::Print(e) => walk_expr(e, name, out),
                Stmt::Var {
                    initializer: Some(e),
                    ..
                } => walk_expr(e, name, out),
                Stmt::Var { .. } => {}
                Stmt::Block(stmts) => stmts.iter().for_each(|s| walk_stmt(s, name, out)),
                Stmt::If {
                    condition,
                    then_branch,
                    else_branch,
                } => {
                    walk_expr(condition, name, out);
                    walk_stmt(then_branch, name, out);
                    if let Some(e) = else_branch {
                        walk_stmt(e, name, out);
                    }
                }
                Stmt::While { condition, body } => {
                    walk_expr(condition, name, out);
                    walk_stmt(body, name, out);
                }
                Stmt::Function(decl) => decl.body.iter().for_each(|s| walk_stmt(s, name, out)),
                Stmt::Return { value, .. } => {
                    if let Some(e) = value {
                        walk_expr(e, name, out);
                    }
                }
                Stmt::Class { methods, .. } => methods
                    .iter()
                    .flat_map(|m| m.body.iter())
                    .for_each(|s| walk_stmt(s, name, out)),
            }
        }

        fn walk_expr(expr: &Expr, name: &str, out: &mut Vec<ExprId>) {
            match expr {
                Expr::Variable { id, name: n } if n.lexeme == name => out.push(*id),
                Expr::Variable { .. } | Expr::Literal(_) | Expr::This { .. } => {}
                Expr::Grouping(e) | Expr::Unary { right: e, .. } => walk_expr(e, name, out),
                Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                    walk_expr(left, name, out);
                    walk_expr(right, name, out);
                }
                Expr::Assign { value, .. } => walk_expr(value, name, out),
                Expr::Call {
                    callee, arguments, ..
                } => {
                    walk_expr(callee, name, out);
                    arguments.iter().for_each(|a| walk_expr(a, name, out));
                }
                Expr::Get { object, .. } => walk_expr(object, name, out),
                Expr::Set { object, value, .. } => {
                    walk_expr(object, name, out);
                    walk_expr(value, name, out);
                }
            }
        }

        let mut out = Vec::new();
        statements.iter().for_each(|s| walk_stmt(s, name, &mut out));
        out
    }

    #[test]
    fn test_shadowing_local_resolves_to_distance_zero() {
        let (statements, interpreter, errors) = resolve("var a = 1; { var a = 2; print a; }");

        assert!(errors.is_empty());
        let ids = variable_ids(&statements, "a");
        assert_eq!(interpreter.local_depth(ids[0]), Some(0));
    }

    #[test]
    fn test_top_level_names_stay_global() {
        let (statements, interpreter, errors) = resolve("var a = 1; { print a; }");

        assert!(errors.is_empty());
        let ids = variable_ids(&statements, "a");
        assert_eq!(interpreter.local_depth(ids[0]), None);
    }

    #[test]
    fn test_distance_counts_block_and_function_boundaries() {
        let source = "
{
    var a = 1;
    fun f(p) {
        {
            print a;
            print p;
        }
    }
}";
        let (statements, interpreter, errors) = resolve(source);

        assert!(errors.is_empty());
        // inner block → function frame → enclosing block
        assert_eq!(interpreter.local_depth(variable_ids(&statements, "a")[0]), Some(2));
        assert_eq!(interpreter.local_depth(variable_ids(&statements, "p")[0]), Some(1));
    }

    #[test]
    fn test_identical_references_resolve_independently() {
        let source = "{ var x = 1; { print x; var x = 2; print x; } }";
        let (statements, interpreter, errors) = resolve(source);

        assert!(errors.is_empty());
        let ids = variable_ids(&statements, "x");
        assert_eq!(interpreter.local_depth(ids[0]), Some(1));
        assert_eq!(interpreter.local_depth(ids[1]), Some(0));
    }

    #[test]
    fn test_own_initializer_is_an_error() {
        let (_, _, errors) = resolve("{ var a = a; }");

        assert_eq!(
            errors,
            vec!["[line 1] Error at 'a': Can't read local variable in its own initializer."]
        );
    }

    #[test]
    fn test_global_self_reference_is_allowed_statically() {
        let (_, _, errors) = resolve("var a = a;");

        assert!(errors.is_empty());
    }

    #[test]
    fn test_redeclaration_in_same_scope_is_an_error() {
        let (_, _, errors) = resolve("{ var a = 1; var a = 2; }\n{ var b; { var b; } }");

        assert_eq!(
            errors,
            vec!["[line 1] Error at 'a': Already a variable with this name in this scope."]
        );
    }

    #[test]
    fn test_duplicate_parameter_is_an_error() {
        let (_, _, errors) = resolve("fun f(a, a) {}");

        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_top_level_return_does_not_stop_the_pass() {
        let (_, _, errors) = resolve("return 1;\n{ var a = 1; var a = 2; }\nreturn;");

        assert_eq!(
            errors,
            vec![
                "[line 1] Error at 'return': Can't return from top-level code.",
                "[line 2] Error at 'a': Already a variable with this name in this scope.",
                "[line 3] Error at 'return': Can't return from top-level code.",
            ]
        );
    }

    #[test]
    fn test_this_outside_class_is_an_error() {
        let (_, _, errors) = resolve("print this;\nfun f() { return this; }");

        assert_eq!(errors.len(), 2);
        assert!(errors[0].ends_with("Can't use 'this' outside of a class."));
    }

    #[test]
    fn test_methods_can_use_this_and_their_class() {
        let source = "class A { m() { print this; return A; } }";
        let (statements, _, errors) = resolve(source);

        assert!(errors.is_empty());
        assert_eq!(variable_ids(&statements, "A").len(), 1);
    }
}
