//! Sample view drawn by the CLI

use drawboard_graphics::prelude::*;
use tracing::warn;

/// Paint a small dashboard card: gradient header, gauge arc, sparkline,
/// badge and caption
pub fn draw_sample(canvas: &mut dyn Canvas, frame: Rect) {
    let card = frame.inflate(-8.0, -8.0);
    canvas.draw_rectangle(
        card,
        Some(&Pen::new(Colors::DARK_GRAY, 1.0)),
        Some(&Brush::solid(Colors::WHITE)),
    );

    let header = Rect::new(card.x, card.y, card.width, card.height * 0.25);
    canvas.draw_rectangle(
        header,
        None,
        Some(&Brush::vertical_gradient(
            Color::from_hex_rgb(0x3F51B5),
            Color::from_hex_rgb(0x1A237E),
        )),
    );
    canvas.draw_text(
        "Drawboard",
        header.inflate(-12.0, 0.0),
        &Font::new("sans-serif", header.height * 0.45),
        TextAlignment::Left,
        None,
        Some(&Brush::solid(Colors::WHITE)),
    );

    let body = Rect::new(card.x, header.bottom(), card.width, card.height - header.height);
    draw_gauge(canvas, Rect::new(body.x, body.y, body.width * 0.4, body.height));
    draw_sparkline(
        canvas,
        Rect::new(body.x + body.width * 0.4, body.y, body.width * 0.6, body.height).inflate(-12.0, -16.0),
    );

    canvas.save_state();
    canvas.transform(Transform::rotate_around(
        -0.3,
        Point::new(card.right() - 24.0, card.y + 24.0),
    ));
    canvas.fill_ellipse(
        Rect::new(card.right() - 40.0, card.y + 12.0, 32.0, 24.0),
        Colors::ORANGE,
    );
    canvas.restore_state();

    let swatch = Image::from_colors(&[Colors::RED, Colors::GREEN, Colors::BLUE, Colors::YELLOW], 2, 1.0);
    match swatch {
        Ok(swatch) => {
            let spot = Rect::new(card.right() - 28.0, card.bottom() - 28.0, 20.0, 20.0);
            if let Err(e) = canvas.draw_image(&swatch, spot, 0.8) {
                warn!("Swatch not drawn: {}", e);
            }
        }
        Err(e) => warn!("Swatch image: {}", e),
    }
}

fn draw_gauge(canvas: &mut dyn Canvas, area: Rect) {
    let radius = (area.width.min(area.height) / 2.0 - 16.0).max(4.0);
    let center = area.center();
    let track = PathBuilder::new()
        .move_to(center.x - radius, center.y)
        .arc_to(center.x + radius, center.y, radius, false, true)
        .build();
    canvas.draw_path(&track, Some(&Pen::new(Colors::LIGHT_GRAY, 8.0)), None);

    // Two thirds of the way round the half circle
    let angle = std::f32::consts::PI * (1.0 + 2.0 / 3.0);
    let value = PathBuilder::new()
        .move_to(center.x - radius, center.y)
        .arc_to(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
            radius,
            false,
            true,
        )
        .build();
    canvas.draw_path(&value, Some(&Pen::new(Color::from_hex_rgb(0x43A047), 8.0)), None);
    canvas.draw_text(
        "67%",
        Rect::new(center.x - radius, center.y - 4.0, radius * 2.0, 24.0),
        &Font::new("sans-serif", 18.0),
        TextAlignment::Center,
        Some(&Pen::new(Colors::DARK_GRAY, 1.0)),
        None,
    );
}

fn draw_sparkline(canvas: &mut dyn Canvas, area: Rect) {
    const SAMPLES: [f32; 8] = [0.2, 0.45, 0.3, 0.6, 0.55, 0.8, 0.7, 0.9];

    let step = area.width / (SAMPLES.len() - 1) as f32;
    let points: Vec<Point> = SAMPLES
        .iter()
        .enumerate()
        .map(|(i, v)| Point::new(area.x + step * i as f32, area.bottom() - v * area.height))
        .collect();

    let mut fill = PathBuilder::new().move_to(area.x, area.bottom());
    for p in &points {
        fill = fill.line_to(p.x, p.y);
    }
    let fill = fill.line_to(area.right(), area.bottom()).close().build();
    canvas.draw_path(
        &fill,
        None,
        Some(&Brush::vertical_gradient(
            Color::from_hex_rgb(0x90CAF9),
            Colors::WHITE,
        )),
    );

    let mut line = PathBuilder::new().move_to(points[0].x, points[0].y);
    for p in &points[1..] {
        line = line.line_to(p.x, p.y);
    }
    canvas.draw_path(&line.build(), Some(&Pen::new(Color::from_hex_rgb(0x1E88E5), 2.0)), None);
    for p in &points {
        canvas.fill_ellipse(Rect::new(p.x - 2.5, p.y - 2.5, 5.0, 5.0), Color::from_hex_rgb(0x1E88E5));
    }
}
