/// Possible simplification steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// `a+(b+c) = a+b+c`
    /// `a*(b*c) = a*b*c`
    Flatten,

    /// `0+a = a`
    /// `a+0 = a`
    AddZero,

    /// `0*a = 0`
    /// `a*0 = 0`
    MultiplyZero,

    /// `1*a = a`
    /// `a*1 = a`
    MultiplyOne,

    /// `2*a*3^-1*3 = 2*a`
    /// `6/4 = 3/2`
    FoldCoefficients,

    /// `a+a = 2a`
    /// `2a+3a = 5a`
    /// `a-a = 0`
    CombineLikeTerms,

    /// `a*a = a^2`
    /// `a^2*a^-1 = a`
    CombineLikeFactors,

    /// `a^0 = 1`
    PowerZero,

    /// `0^a = 0`
    PowerZeroLeft,

    /// `1^a = 1`
    PowerOneLeft,

    /// `a^1 = a`
    PowerOne,

    /// `(a^b)^c = a^(b*c)`, for integer `b` and `c`
    PowerPower,

    /// `2^3 = 8`
    IntegerPower,

    /// `i^n`, with `n mod 4` as payload: `i^2 = -1`, `i^7 = -i`
    ImaginaryPower(u32),
}
