use std::fmt::{self, Display, Write as _};
use std::path::Path;

use anyhow::{Context, Result};
use log::warn;

// 每行8个元素
const VALUES_PER_LINE: usize = 8;
const INDENT: &str = "    ";

/// 生成的C头文件
pub struct HeaderDocument<'a> {
    pub source_name: &'a str,
    pub ident: &'a str,
    pub width: u32,
    pub height: u32,
    pub pixels: &'a [u16],
}

impl<'a> HeaderDocument<'a> {
    pub fn new(source_name: &'a str, ident: &'a str, width: u32, height: u32, pixels: &'a [u16]) -> Self {
        if !is_c_identifier(ident) {
            warn!("'{ident}' is not a valid C identifier, the generated header may not compile");
        }
        Self { source_name, ident, width, height, pixels }
    }

    pub fn byte_size(&self) -> u64 {
        self.width as u64 * self.height as u64 * 2
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    /// 整个文档先在内存中生成, 再一次性写入(覆盖已有文件)
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render())
            .with_context(|| format!("failed to write {}", path.display()))
    }

    fn write_values(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.pixels.len();
        let row_len = self.width.max(1) as usize;
        for (i, px) in self.pixels.iter().enumerate() {
            // 每一行像素开头都缩进, 与每8个元素的换行互相独立
            if i % row_len == 0 {
                f.write_str(INDENT)?;
            }
            write!(f, "0x{px:04X}")?;
            let written = i + 1;
            if written < total {
                f.write_str(", ")?;
                if written % VALUES_PER_LINE == 0 {
                    f.write_char('\n')?;
                    f.write_str(INDENT)?;
                }
            }
        }
        Ok(())
    }
}

impl Display for HeaderDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let upper = self.ident.to_uppercase();
        let count = self.width as u64 * self.height as u64;

        writeln!(f, "// Auto-generated from {}", self.source_name)?;
        writeln!(f, "// Image size: {}x{} pixels", self.width, self.height)?;
        writeln!(f, "// Data size: {} bytes", self.byte_size())?;
        writeln!(f)?;
        writeln!(f, "#ifndef {upper}_H")?;
        writeln!(f, "#define {upper}_H")?;
        writeln!(f)?;
        writeln!(f, "#include <stdint.h>")?;
        writeln!(f)?;
        writeln!(f, "#define {upper}_WIDTH {}", self.width)?;
        writeln!(f, "#define {upper}_HEIGHT {}", self.height)?;
        writeln!(f)?;
        writeln!(f, "const uint16_t {}[{count}] = {{", self.ident)?;
        self.write_values(f)?;
        writeln!(f)?;
        writeln!(f, "}};")?;
        writeln!(f)?;
        writeln!(f, "#endif // {upper}_H")
    }
}

fn is_c_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_pixel_logo() {
        let pixels = [0xF800u16, 0x07E0];
        let doc = HeaderDocument::new("logo.png", "logo", 2, 1, &pixels);
        let expected = "\
// Auto-generated from logo.png
// Image size: 2x1 pixels
// Data size: 4 bytes

#ifndef LOGO_H
#define LOGO_H

#include <stdint.h>

#define LOGO_WIDTH 2
#define LOGO_HEIGHT 1

const uint16_t logo[2] = {
    0xF800, 0x07E0
};

#endif // LOGO_H
";
        assert_eq!(doc.render(), expected);
    }

    #[test]
    fn line_break_after_every_eighth_value() {
        let pixels: Vec<u16> = (0..9).collect();
        let doc = HeaderDocument::new("a.png", "icon_data", 9, 1, &pixels);
        let text = doc.render();
        assert!(text.contains(
            "const uint16_t icon_data[9] = {\n    \
             0x0000, 0x0001, 0x0002, 0x0003, 0x0004, 0x0005, 0x0006, 0x0007, \n    \
             0x0008\n};\n"
        ));
        assert!(text.contains("#define ICON_DATA_WIDTH 9\n#define ICON_DATA_HEIGHT 1\n"));
    }

    #[test]
    fn each_row_starts_indented() {
        let pixels: Vec<u16> = (1..=6).collect();
        let text = HeaderDocument::new("a.png", "x", 3, 2, &pixels).render();
        assert!(text.contains(
            "const uint16_t x[6] = {\n    0x0001, 0x0002, 0x0003,     0x0004, 0x0005, 0x0006\n};\n"
        ));
    }

    #[test]
    fn row_indent_stacks_after_line_break() {
        let pixels: Vec<u16> = (0..16).collect();
        let text = HeaderDocument::new("a.png", "x", 8, 2, &pixels).render();
        assert!(text.contains(
            "= {\n    \
             0x0000, 0x0001, 0x0002, 0x0003, 0x0004, 0x0005, 0x0006, 0x0007, \n        \
             0x0008, 0x0009, 0x000A, 0x000B, 0x000C, 0x000D, 0x000E, 0x000F\n};\n"
        ));
    }

    #[test]
    fn three_by_three_wraps_mid_row() {
        let pixels: Vec<u16> = (0..9).collect();
        let text = HeaderDocument::new("a.png", "x", 3, 3, &pixels).render();
        assert!(text.contains(
            "= {\n    \
             0x0000, 0x0001, 0x0002,     0x0003, 0x0004, 0x0005,     0x0006, 0x0007, \n    \
             0x0008\n};\n"
        ));
    }

    #[test]
    fn no_break_after_last_value() {
        let pixels = [0xABCDu16; 16];
        let text = HeaderDocument::new("a.png", "x", 16, 1, &pixels).render();
        assert!(text.contains(", \n    0xABCD"));
        assert!(text.contains("0xABCD\n};"));
        assert_eq!(text.matches(", \n").count(), 1);
        assert!(!text.contains("0xABCD, \n};"));
    }

    #[test]
    fn hex_is_uppercase_and_padded() {
        let pixels = [0x000au16, 0xbeef];
        let text = HeaderDocument::new("a.png", "x", 2, 1, &pixels).render();
        assert!(text.contains("0x000A, 0xBEEF\n"));
    }

    #[test]
    fn entry_count_and_byte_size() {
        let pixels = vec![0x1234u16; 7 * 5];
        let doc = HeaderDocument::new("photo.jpg", "p", 7, 5, &pixels);
        let text = doc.render();
        assert_eq!(text.matches("0x1234").count(), 35);
        assert_eq!(doc.byte_size(), 70);
        assert!(text.contains("// Data size: 70 bytes\n"));
        assert!(text.contains("const uint16_t p[35] = {"));
    }

    #[test]
    fn identifier_check() {
        assert!(is_c_identifier("company_logo"));
        assert!(is_c_identifier("_x1"));
        assert!(!is_c_identifier("1abc"));
        assert!(!is_c_identifier("my-logo"));
        assert!(!is_c_identifier(""));
    }
}
