/// Small grammar with non-ASCII host code in front of a symbol, so byte and UTF-16 columns
/// differ on line 7.
pub(crate) const SAMPLE: &str = "COMPILER Calc
CHARACTERS
  digit = \"0123456789\".
TOKENS
  number = digit {digit}.
PRODUCTIONS
  Calc = (. s = \"é→\"; .) Expr .
  Expr = number { '+' number } .
END Calc.
";

pub(crate) fn sample_source() -> &'static str {
    SAMPLE
}
