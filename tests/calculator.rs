use ai_toolkit::tools::calculator::{evaluate, CalculatorTool, SUPPORTED_OPERATIONS};
use ai_toolkit::tools::Tool;

#[tokio::test]
async fn test_results_are_formatted() {
    let calc = CalculatorTool::new();
    let cases = [
        ("2 + 2", "4"),
        ("10 / 4", "2.5"),
        ("2^10", "1024"),
        ("3 ** 2", "9"),
        ("sqrt(16)", "4"),
        ("(1 + 2) * (3 + 4)", "21"),
        ("1 / 3", "0.3333333333"),
        ("0.1 + 0.2", "0.3"),
        ("cos(0)", "1"),
        ("log(100)", "2"),
        ("ln(e)", "1"),
        ("abs(-7.5)", "7.5"),
        ("floor(3.99)", "3"),
        ("ceil(3.01)", "4"),
        ("5 plus 3", "8"),
        ("9 minus 10", "-1"),
        ("7 multiplied by 6", "42"),
        ("4 squared", "16"),
        ("2 cubed", "8"),
        ("square root of 81", "9"),
        ("17 mod 5", "2"),
        ("2pi / pi", "2"),
    ];
    for (input, expected) in cases {
        assert_eq!(calc.execute(input).await, expected, "input: {}", input);
    }
}

#[tokio::test]
async fn test_errors_are_strings_not_panics() {
    let calc = CalculatorTool::new();
    let deep = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
    let inputs = [
        "1/0", "sqrt(-4)", "2 +", "((2)", "hello", "2 $ 2", "log(0)", "1e999", "2 3",
        "1,000 * 2", deep.as_str(),
    ];
    for input in inputs {
        let output = calc.execute(input).await;
        assert!(
            output.starts_with("Error: Could not calculate. "),
            "input {:?} gave {:?}",
            truncate(input),
            output
        );
        assert!(output.ends_with(&format!("Supported operations: {}", SUPPORTED_OPERATIONS)));
    }
}

#[test]
fn test_trigonometry_accuracy() {
    assert!((evaluate("sin(π/2)").unwrap() - 1.0).abs() < 1e-12);
    assert!((evaluate("tan(pi/4)").unwrap() - 1.0).abs() < 1e-12);
    assert!((evaluate("3^(1/3)").unwrap() - 3f64.cbrt()).abs() < 1e-12);
}

fn truncate(input: &str) -> &str {
    input.get(..40).unwrap_or(input)
}
