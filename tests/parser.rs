#[cfg(test)]
mod parser_tests {
    use rox::ast::{Expr, Stmt};
    use rox::ast_printer::AstPrinter;
    use rox::error::Diagnostics;
    use rox::parser::{Parser, MAX_NESTING};
    use rox::scan_tokens;
    use rox::token::{Token, TokenType};

    /// Parse `source`, returning printed statements and rendered diagnostics.
    fn parse(source: &str) -> (Vec<String>, Vec<String>) {
        let mut diagnostics = Diagnostics::new();
        let tokens = scan_tokens(source, &mut diagnostics);
        let statements = Parser::new(&tokens).parse(&mut diagnostics);

        (
            statements.iter().map(AstPrinter::print_stmt).collect(),
            diagnostics.iter().map(|e| e.to_string()).collect(),
        )
    }

    fn parse_ok(source: &str) -> Vec<String> {
        let (statements, errors) = parse(source);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        statements
    }

    #[test]
    fn test_precedence_and_associativity() {
        assert_eq!(
            parse_ok("print 1 + 2 * 3 - 4 / 2;"),
            vec!["(print (- (+ 1.0 (* 2.0 3.0)) (/ 4.0 2.0)))"]
        );
        assert_eq!(
            parse_ok("print !(1 < 2) == false or nil and true;"),
            vec!["(print (or (== (! (group (< 1.0 2.0))) false) (and nil true)))"]
        );
        assert_eq!(parse_ok("-a - -b;"), vec!["(; (- (- a) (- b)))"]);
    }

    #[test]
    fn test_assignment_is_right_associative() {
        assert_eq!(parse_ok("a = b = 3;"), vec!["(; (= a (= b 3.0)))"]);
    }

    #[test]
    fn test_property_assignment_becomes_set() {
        assert_eq!(
            parse_ok("obj.field.inner = 1;"),
            vec!["(; (= (. (. obj field) inner) 1.0))"]
        );
        assert_eq!(parse_ok("a.b(1)(2).c;"), vec!["(; (. (call (call (. a b) 1.0) 2.0) c))"]);
    }

    #[test]
    fn test_invalid_assignment_target_does_not_abort() {
        let (statements, errors) = parse("1 + 2 = 3; print 4;");

        assert_eq!(errors, vec!["[line 1] Error at '=': Invalid assignment target."]);
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[1], "(print 4.0)");
    }

    #[test]
    fn test_for_loop_is_desugared_into_while() {
        assert_eq!(
            parse_ok("for (var i = 0; i < 3; i = i + 1) print i;"),
            vec!["(block (var i 0.0) (while (< i 3.0) (block (print i) (; (= i (+ i 1.0))))))"]
        );
        assert_eq!(parse_ok("for (;;) x;"), vec!["(while true (; x))"]);
    }

    #[test]
    fn test_else_binds_to_nearest_if() {
        assert_eq!(
            parse_ok("if (a) if (b) print 1; else print 2;"),
            vec!["(if a (if-else b (print 1.0) (print 2.0)))"]
        );
    }

    #[test]
    fn test_functions_and_classes() {
        assert_eq!(
            parse_ok("fun add(a, b) { return a + b; }"),
            vec!["(fun add(a b) (return (+ a b)))"]
        );
        assert_eq!(
            parse_ok("class P { init(x) { this.x = x; } get() { return; } }"),
            vec!["(class P (method init(x) (; (= (. this x) x))) (method get() (return)))"]
        );
    }

    #[test]
    fn test_synchronize_reports_one_error_per_statement() {
        let (statements, errors) = parse("var = 1;\nprint 2;\nvar x = ;\nprint 3;");

        assert_eq!(
            errors,
            vec![
                "[line 1] Error at '=': Expect variable name.",
                "[line 3] Error at ';': Expect expression.",
            ]
        );
        assert_eq!(statements, vec!["(print 2.0)", "(print 3.0)"]);
    }

    #[test]
    fn test_error_at_end_of_input() {
        let (_, errors) = parse("print 1");

        assert_eq!(errors, vec!["[line 1] Error at end: Expect ';' after value."]);
    }

    #[test]
    fn test_too_many_arguments_is_reported_but_parsed() {
        let args: Vec<String> = (0..256).map(|i| i.to_string()).collect();
        let source = format!("f({});", args.join(", "));

        let (statements, errors) = parse(&source);

        assert_eq!(errors.len(), 1);
        assert!(errors[0].ends_with("Can't have more than 255 arguments."));
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_too_many_parameters_is_reported() {
        let params: Vec<String> = (0..256).map(|i| format!("p{}", i)).collect();
        let source = format!("fun f({}) {{}}", params.join(", "));

        let (_, errors) = parse(&source);

        assert_eq!(errors.len(), 1);
        assert!(errors[0].ends_with("Can't have more than 255 parameters."));
    }

    #[test]
    fn test_super_is_not_an_expression() {
        let (_, errors) = parse("super.x;");

        assert_eq!(errors, vec!["[line 1] Error at 'super': Expect expression."]);
    }

    #[test]
    fn test_parsing_is_deterministic() {
        let source = "var a = 1; { var b = a + 2; fun f(x) { return x * b; } print f(a); }";

        assert_eq!(parse_ok(source), parse_ok(source));
    }

    #[test]
    fn test_identical_references_get_distinct_ids() {
        let mut diagnostics = Diagnostics::new();
        let tokens = scan_tokens("a; a;", &mut diagnostics);
        let statements = Parser::new(&tokens).parse(&mut diagnostics);

        let ids: Vec<_> = statements
            .iter()
            .map(|stmt| match stmt {
                Stmt::Expression(Expr::Variable { id, .. }) => *id,
                other => panic!("unexpected statement {:?}", other),
            })
            .collect();

        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn test_parse_expression() {
        let mut diagnostics = Diagnostics::new();
        let tokens = scan_tokens("(1 + 2) * 3", &mut diagnostics);
        let expr = Parser::new(&tokens).parse_expression(&mut diagnostics);

        assert!(diagnostics.is_empty());
        assert_eq!(
            expr.map(|e| AstPrinter::print(&e)),
            Some("(* (group (+ 1.0 2.0)) 3.0)".to_string())
        );

        let mut diagnostics = Diagnostics::new();
        let tokens = scan_tokens("1 2", &mut diagnostics);
        assert!(Parser::new(&tokens).parse_expression(&mut diagnostics).is_none());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_deep_parentheses_are_reported_not_recursed() {
        let source = format!("print {}1{};\nprint 2;", "(".repeat(20_000), ")".repeat(20_000));

        let (statements, errors) = parse(&source);

        assert_eq!(errors.len(), 1);
        assert!(errors[0].ends_with("Too deeply nested."), "{}", errors[0]);
        assert_eq!(statements, vec!["(print 2.0)"]);
    }

    #[test]
    fn test_deep_unary_chain_is_reported() {
        let source = format!("print {}1;", "-".repeat(20_000));

        let (_, errors) = parse(&source);

        assert_eq!(errors.len(), 1);
        assert!(errors[0].ends_with("Too deeply nested."));
    }

    #[test]
    fn test_deep_blocks_are_reported() {
        let source = format!("{}{}", "{".repeat(5_000), "}".repeat(5_000));

        let (statements, errors) = parse(&source);

        assert!(statements.is_empty());
        assert!(errors[0].ends_with("Too deeply nested."));
    }

    #[test]
    fn test_nesting_below_the_limit_parses() {
        let depth = MAX_NESTING / 2;
        let source = format!("print {}1{};", "(".repeat(depth), ")".repeat(depth));

        assert_eq!(parse_ok(&source).len(), 1);
    }

    #[test]
    fn test_token_slice_without_eof() {
        let mut diagnostics = Diagnostics::new();
        assert!(Parser::new(&[]).parse(&mut diagnostics).is_empty());
        assert!(diagnostics.is_empty());

        let tokens = vec![
            Token::new(TokenType::IDENTIFIER, "a", 1),
            Token::new(TokenType::SEMICOLON, ";", 1),
        ];
        let statements = Parser::new(&tokens).parse(&mut diagnostics);
        assert_eq!(statements.len(), 1);
        assert!(diagnostics.is_empty());
    }
}
