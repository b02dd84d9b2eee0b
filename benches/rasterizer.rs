use std::rc::Rc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use projector::colors;
use projector::math::Vec2;
use projector::render::{rasterize_triangle, DepthBuffer, PixelBuffer, ScreenTriangle};
use projector::{Camera, Mesh, Model, Texture};

const BUFFER_WIDTH: u32 = 800;
const BUFFER_HEIGHT: u32 = 600;

const UVS: [Vec2; 3] = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];

fn triangle(points: [(f32, f32); 3], depths: [f32; 3]) -> ScreenTriangle {
    ScreenTriangle::new(points.map(|(x, y)| Vec2::new(x, y)), depths, UVS)
}

fn small_triangle() -> ScreenTriangle {
    triangle([(100.0, 100.0), (120.0, 100.0), (110.0, 120.0)], [10.0; 3])
}

fn medium_triangle() -> ScreenTriangle {
    triangle([(100.0, 100.0), (300.0, 100.0), (200.0, 300.0)], [10.0, 20.0, 30.0])
}

fn large_triangle() -> ScreenTriangle {
    triangle([(50.0, 50.0), (750.0, 100.0), (400.0, 550.0)], [10.0, 40.0, 80.0])
}

fn benchmark_single_triangle(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_triangle");
    let texture = Texture::checkerboard(64, 8, colors::WHITE, colors::BLACK).unwrap();

    for (name, tri) in [
        ("small", small_triangle()),
        ("medium", medium_triangle()),
        ("large", large_triangle()),
    ] {
        group.bench_with_input(BenchmarkId::new("textured", name), &tri, |b, tri| {
            let mut surface = PixelBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT, colors::WHITE);
            let mut depth = DepthBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
            b.iter(|| {
                depth.clear();
                rasterize_triangle(black_box(tri), &texture, &mut depth, &mut surface)
            });
        });
    }

    group.finish();
}

fn benchmark_render_cubes(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let texture = Rc::new(Texture::checkerboard(64, 8, colors::WHITE, colors::BLACK).unwrap());

    // A grid of cubes in front of the camera
    let models: Vec<Model> = (0..5)
        .flat_map(|row| (0..5).map(move |col| (row, col)))
        .map(|(row, col)| {
            let mut model = Model::new(Mesh::cube(), 20.0);
            model
                .transform_mut()
                .set_position_xyz(col as f32 * 40.0 - 80.0, row as f32 * 40.0 - 80.0, 300.0)
                .set_rotation_xyz(30.0, 45.0, 0.0);
            model.set_texture(Rc::clone(&texture));
            model
        })
        .collect();

    group.bench_function("one_cube", |b| {
        let mut camera = Camera::new();
        let mut surface = PixelBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT, colors::WHITE);
        b.iter(|| {
            surface.clear(colors::WHITE);
            camera.render(black_box(&models[12..13]), &mut surface);
        });
    });

    group.bench_function("25_cubes", |b| {
        let mut camera = Camera::new();
        let mut surface = PixelBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT, colors::WHITE);
        b.iter(|| {
            surface.clear(colors::WHITE);
            camera.render(black_box(&models), &mut surface);
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_single_triangle, benchmark_render_cubes);
criterion_main!(benches);
