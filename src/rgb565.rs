/// RGB888转RGB565, 直接截断低位 (R/B丢弃3位, G丢弃2位)
#[inline]
pub fn rgb_to_rgb565(r: u8, g: u8, b: u8) -> u16 {
    let r5 = (r >> 3) as u16;
    let g6 = (g >> 2) as u16;
    let b5 = (b >> 3) as u16;

    (r5 << 11) | (g6 << 5) | b5
}

/// 按缓冲区顺序把紧凑排列的RGB888数据转换为RGB565, 每3字节对应一个像素
pub fn rgb888_to_rgb565(rgb: &[u8]) -> Vec<u16> {
    let mut rgb565 = Vec::with_capacity(rgb.len() / 3);
    for p in rgb.chunks_exact(3) {
        rgb565.push(rgb_to_rgb565(p[0], p[1], p[2]));
    }
    rgb565
}
