#[cfg(test)]
mod scanner_tests {
    use rox::error::{Diagnostics, LoxError};
    use rox::scanner::*;
    use rox::token::*;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source);
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), expected.len(), "tokens: {:?}", tokens);

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "({*.,+*})",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::DOT, "."),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_two_char_operators_use_maximal_munch() {
        assert_token_sequence(
            "! != = == < <= > >=",
            &[
                (TokenType::BANG, "!"),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL, "="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::LESS, "<"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER, ">"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_greater_and_less_are_distinct() {
        let tokens: Vec<_> = Scanner::new("a > b < c").filter_map(Result::ok).collect();

        assert!(matches!(tokens[1].token_type, TokenType::GREATER));
        assert!(matches!(tokens[3].token_type, TokenType::LESS));
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_token_sequence(
            "class fun var_ orchid _x this super",
            &[
                (TokenType::CLASS, "class"),
                (TokenType::FUN, "fun"),
                (TokenType::IDENTIFIER, "var_"),
                (TokenType::IDENTIFIER, "orchid"),
                (TokenType::IDENTIFIER, "_x"),
                (TokenType::THIS, "this"),
                (TokenType::SUPER, "super"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_number_literals() {
        let tokens: Vec<_> = Scanner::new("123 3.25 1.").filter_map(Result::ok).collect();

        assert!(matches!(tokens[0].token_type, TokenType::NUMBER(n) if n == 123.0));
        assert!(matches!(tokens[1].token_type, TokenType::NUMBER(n) if n == 3.25));

        // A trailing dot without digits is its own token.
        assert!(matches!(tokens[2].token_type, TokenType::NUMBER(n) if n == 1.0));
        assert_eq!(tokens[2].lexeme, "1");
        assert_eq!(tokens[3].token_type, TokenType::DOT);
    }

    #[test]
    fn test_string_literal_spans_lines() {
        let tokens: Vec<_> = Scanner::new("\"a\nb\" x").filter_map(Result::ok).collect();

        match &tokens[0].token_type {
            TokenType::STRING(s) => assert_eq!(s, "a\nb"),
            other => panic!("expected string, got {:?}", other),
        }
        assert_eq!(tokens[0].lexeme, "\"a\nb\"");
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_comments_are_skipped_and_lines_counted() {
        let source = "// line comment\n/* block\ncomment */ print /* inline */ 1;";
        let tokens: Vec<_> = Scanner::new(source).filter_map(Result::ok).collect();

        assert_eq!(tokens[0].token_type, TokenType::PRINT);
        assert_eq!(tokens[0].line, 3);
        assert_eq!(tokens.last().map(|t| t.line), Some(3));
        assert_eq!(tokens.len(), 4);
    }

    #[test]
    fn test_unexpected_chars_token_sequence() {
        let source = ",.$(#";
        let results: Vec<_> = Scanner::new(source).collect();

        // COMMA, DOT, error '$', LEFT_PAREN, error '#', EOF
        assert_eq!(results.len(), 6, "Expected 6 items in result");

        assert_token_matches(&results[0], TokenType::COMMA, ",");
        assert_token_matches(&results[1], TokenType::DOT, ".");
        assert_token_matches(&results[3], TokenType::LEFT_PAREN, "(");
        assert_token_matches(&results[5], TokenType::EOF, "");

        let errors: Vec<String> = results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .map(|e| e.to_string())
            .collect();

        assert_eq!(
            errors,
            vec![
                "[line 1] Error: Unexpected character: $".to_string(),
                "[line 1] Error: Unexpected character: #".to_string(),
            ]
        );

        fn assert_token_matches(
            result: &Result<Token, LoxError>,
            expected_type: TokenType,
            expected_lexeme: &str,
        ) {
            match result {
                Ok(token) => {
                    assert_eq!(
                        token.token_type, expected_type,
                        "Expected token type {:?}, got {:?}",
                        expected_type, token.token_type
                    );
                    assert_eq!(
                        token.lexeme, expected_lexeme,
                        "Expected lexeme '{}', got '{}'",
                        expected_lexeme, token.lexeme
                    );
                }
                Err(e) => panic!("Expected token but got error: {}", e),
            }
        }
    }

    #[test]
    fn test_non_ascii_unexpected_character_keeps_scanning() {
        let mut diagnostics = Diagnostics::new();
        let tokens = scan_tokens("é + 1", &mut diagnostics);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics.iter().next().map(|e| e.to_string()),
            Some("[line 1] Error: Unexpected character: é".to_string())
        );
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_unterminated_string_and_comment() {
        let mut diagnostics = Diagnostics::new();
        let tokens = scan_tokens("print \"oops\n", &mut diagnostics);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics.iter().next().map(|e| e.message()),
            Some("Unterminated string.".to_string())
        );
        assert_eq!(tokens.last().map(|t| t.line), Some(2));

        let mut diagnostics = Diagnostics::new();
        scan_tokens("1 /* never\nclosed", &mut diagnostics);
        assert_eq!(
            diagnostics.iter().next().map(|e| e.to_string()),
            Some("[line 2] Error: Unterminated block comment.".to_string())
        );
    }

    #[test]
    fn test_lexemes_reproduce_significant_source() {
        let source = "var total = (a+b) * 2.5; // trailing\nprint total>=10;";
        let mut diagnostics = Diagnostics::new();
        let tokens = scan_tokens(source, &mut diagnostics);

        let rebuilt: String = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        let significant: String = "var total = (a+b) * 2.5;\nprint total>=10;"
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        assert!(diagnostics.is_empty());
        assert_eq!(rebuilt, significant);
    }

    #[test]
    fn test_token_display() {
        let tokens: Vec<_> = Scanner::new("42 \"hi\" x").filter_map(Result::ok).collect();

        assert_eq!(tokens[0].to_string(), "NUMBER 42 42.0");
        assert_eq!(tokens[1].to_string(), "STRING \"hi\" hi");
        assert_eq!(tokens[2].to_string(), "IDENTIFIER x null");
        assert_eq!(tokens[3].to_string(), "EOF  null");
    }
}
