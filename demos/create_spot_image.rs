use image::{Rgb, RgbImage};

fn main() -> anyhow::Result<()> {
    let mut img = RgbImage::from_pixel(400, 300, Rgb([40, 40, 40]));

    // A few bright discs of different sizes
    let spots = [(80, 70, 20), (250, 120, 35), (330, 240, 12), (120, 220, 25)];
    for (cx, cy, r) in spots {
        imageproc::drawing::draw_filled_circle_mut(&mut img, (cx, cy), r, Rgb([240, 240, 240]));
    }

    img.save("spots.png")?;
    println!("Created spots.png (400x300, {} white spots)", spots.len());
    Ok(())
}
