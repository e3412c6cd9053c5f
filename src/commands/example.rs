pub const EXAMPLE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200" viewBox="0 0 200 200">
  <defs>
    <linearGradient id="sky" x1="0" y1="0" x2="1" y2="1">
      <stop offset="0" stop-color="#3a7bd5"/>
      <stop offset="1" stop-color="#00d2ff"/>
    </linearGradient>
  </defs>
  <rect x="10" y="10" width="180" height="180" rx="24" fill="url(#sky)"/>
  <circle cx="100" cy="100" r="52" fill="none" stroke="#ffffff" stroke-width="8"/>
  <path d="M76 100 L94 118 L126 84" fill="none" stroke="#ffffff" stroke-width="10"
        stroke-linecap="round" stroke-linejoin="round"/>
</svg>
"##;

pub fn example() {
    print!("{EXAMPLE_SVG}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{resolve, validate, Size};

    #[test]
    fn example_is_valid() {
        assert!(validate(EXAMPLE_SVG).is_ok());
        assert_eq!(resolve(EXAMPLE_SVG), Size::new(200.0, 200.0));
    }
}
