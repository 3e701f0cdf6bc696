/// Formats a finite float the way ECMAScript `Number.prototype.toString`
/// does: shortest round-trip digits, plain notation for decimal exponents in
/// `-7..21`, `d.ddde±x` otherwise, and `-0` printed as `0`.
pub(crate) fn format_ecmascript(f: f64) -> String {
    if f == 0.0 {
        return "0".to_owned();
    }
    let mut out = String::new();
    if f < 0.0 {
        out.push('-');
    }
    // `{:e}` yields the shortest digits that round-trip, e.g. "1.2345e-7".
    let sci = format!("{:e}", f.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let n = exp.parse::<i32>().unwrap_or(0) + 1;

    if k <= n && n <= 21 {
        out.push_str(&digits);
        out.extend(std::iter::repeat('0').take((n - k) as usize));
    } else if 0 < n && n <= 21 {
        out.push_str(&digits[..n as usize]);
        out.push('.');
        out.push_str(&digits[n as usize..]);
    } else if -6 < n && n <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat('0').take((-n) as usize));
        out.push_str(&digits);
    } else {
        let e = n - 1;
        out.push_str(&digits[..1]);
        if k > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        out.push('e');
        out.push(if e < 0 { '-' } else { '+' });
        out.push_str(&e.abs().to_string());
    }
    out
}

/// Like [`format_ecmascript`], but keeps a `.0` on integral values so the
/// text reads back as a float rather than an integer.
pub(crate) fn format_json_float(f: f64) -> String {
    let mut s = format_ecmascript(f);
    if !s.contains(|c: char| c == '.' || c == 'e') {
        s.push_str(".0");
    }
    s
}
