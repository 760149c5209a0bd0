use proptest::prelude::*;

use halfcam::core::RasterFrame;
use halfcam::term::encode::{encode, encode_line_into, RESET};
use halfcam::term::TerminalRenderer;
use halfcam::types::ChannelOrder;

fn grid_from_rows(width: usize, rows: &[[u8; 3]]) -> RasterFrame {
    let mut data = Vec::new();
    for px in rows {
        for _ in 0..width {
            data.extend_from_slice(px);
        }
    }
    RasterFrame::new(width, rows.len(), ChannelOrder::Rgb, data).unwrap()
}

#[test]
fn red_top_blue_bottom_two_by_two() {
    let grid = grid_from_rows(2, &[[255, 0, 0], [0, 0, 255]]);
    let lines = encode(&grid);
    assert_eq!(lines.len(), 1);

    let text = std::str::from_utf8(lines[0].as_bytes()).unwrap();
    let cell = "\x1b[38;2;255;0;0m\x1b[48;2;0;0;255m▀";
    assert_eq!(text.matches(cell).count(), 2);
    assert_eq!(text, format!("{cell}{cell}\x1b[0m"));
}

#[test]
fn lines_come_out_top_to_bottom() {
    let grid = grid_from_rows(1, &[[1, 1, 1], [2, 2, 2], [3, 3, 3], [4, 4, 4]]);
    let lines = encode(&grid);
    assert_eq!(
        lines[0].as_bytes(),
        "\x1b[38;2;1;1;1m\x1b[48;2;2;2;2m▀\x1b[0m".as_bytes()
    );
    assert_eq!(
        lines[1].as_bytes(),
        "\x1b[38;2;3;3;3m\x1b[48;2;4;4;4m▀\x1b[0m".as_bytes()
    );
}

#[test]
fn single_line_encoder_matches_full_encode() {
    let grid = grid_from_rows(3, &[[9, 8, 7], [6, 5, 4], [3, 2, 1], [0, 0, 0]]);
    let lines = encode(&grid);
    for (i, line) in lines.iter().enumerate() {
        let mut buf = Vec::new();
        encode_line_into(&grid, i, &mut buf);
        assert_eq!(buf, line.as_bytes());
    }
}

#[test]
fn frame_write_is_home_then_lines() {
    let grid = grid_from_rows(2, &[[10, 20, 30], [40, 50, 60], [70, 80, 90], [1, 2, 3]]);
    let lines = encode(&grid);

    let mut renderer = TerminalRenderer::new(Vec::new());
    renderer.draw(&lines).unwrap();
    let out = renderer.into_inner();

    let mut expected = b"\x1b[1;1H".to_vec();
    for line in &lines {
        expected.extend_from_slice(line.as_bytes());
        expected.push(b'\n');
    }
    assert_eq!(out, expected);
}

proptest! {
    #[test]
    fn every_line_has_width_cells_and_one_reset(
        width in 1usize..40,
        pairs in 1usize..20,
        seed in any::<u8>(),
    ) {
        let height = pairs * 2;
        let data: Vec<u8> = (0..width * height * 3)
            .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
            .collect();
        let grid = RasterFrame::new(width, height, ChannelOrder::Rgb, data).unwrap();
        let lines = encode(&grid);

        prop_assert_eq!(lines.len(), pairs);
        for line in &lines {
            let text = std::str::from_utf8(line.as_bytes()).unwrap();
            prop_assert_eq!(text.matches('▀').count(), width);
            prop_assert_eq!(text.matches("\x1b[38;2;").count(), width);
            prop_assert_eq!(text.matches("\x1b[48;2;").count(), width);
            prop_assert_eq!(text.matches("\x1b[0m").count(), 1);
            prop_assert!(line.as_bytes().ends_with(RESET));
        }
    }
}
