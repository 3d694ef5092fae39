//! 5×7 bitmap digits for tile labels.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect as PixelRect;

use crate::plan::{Badge, GLYPH_ADVANCE};

/// Rows of a 5-wide digit, most significant bit on the left.
const DIGITS: [[u8; 7]; 10] = [
    [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
    [0b01110, 0b10001, 0b00001, 0b00110, 0b01000, 0b10000, 0b11111],
    [0b01110, 0b10001, 0b00001, 0b00110, 0b00001, 0b10001, 0b01110],
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
    [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
    [0b01110, 0b10000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b10000],
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00001, 0b01110],
];

/// Paint the badge background and its number onto a tile.
pub(crate) fn draw_badge(tile: &mut RgbImage, badge: &Badge, fill: Rgb<u8>, ink: Rgb<u8>) {
    let r = badge.rect;
    draw_filled_rect_mut(
        tile,
        PixelRect::at(r.x as i32, r.y as i32).of_size(r.width, r.height),
        fill,
    );

    let (mut x, y) = badge.text_origin;
    let mut buf = [0u8; 20];
    for digit in digits_of(badge.number, &mut buf) {
        draw_digit(tile, x, y, badge.unit, *digit, ink);
        x += GLYPH_ADVANCE * badge.unit;
    }
}

fn draw_digit(tile: &mut RgbImage, x: u32, y: u32, unit: u32, digit: u8, ink: Rgb<u8>) {
    let Some(rows) = DIGITS.get(digit as usize) else {
        return;
    };
    for (row, &bits) in rows.iter().enumerate() {
        for col in 0..5u32 {
            if bits & (1 << (4 - col)) != 0 {
                let px = PixelRect::at((x + col * unit) as i32, (y + row as u32 * unit) as i32)
                    .of_size(unit, unit);
                draw_filled_rect_mut(tile, px, ink);
            }
        }
    }
}

/// Decimal digits of `n`, most significant first.
fn digits_of(mut n: usize, buf: &mut [u8; 20]) -> &[u8] {
    let mut start = buf.len();
    loop {
        start -= 1;
        buf[start] = (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    &buf[start..]
}
