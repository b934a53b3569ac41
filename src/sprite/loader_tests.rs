#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::camera::Viewport;
    use crate::sprite::frame_index::FrameIndex;
    use crate::sprite::loader::{LoaderState, SpriteLoader, clear, preload};

    fn viewport() -> Viewport {
        init_logs();
        Viewport::new(1280.0, 720.0, 16.0, 9.0)
    }

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn write_png(path: &Path, width: u32, height: u32) {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 40, 255]));
        img.save(path).unwrap();
    }

    fn frame_json(x: u32) -> String {
        format!(
            r#"{{"frame":{{"x":{x},"y":0,"w":16,"h":16}},"rotated":false,"trimmed":false,"sourceSize":{{"w":16,"h":16}}}}"#
        )
    }

    fn write_keyed_descriptor(path: &Path, names: &[&str]) {
        let entries: Vec<String> = names
            .iter()
            .enumerate()
            .map(|(i, name)| format!(r#""{name}":{}"#, frame_json((i as u32) * 16)))
            .collect();
        let json = format!(
            r#"{{"frames":{{{}}},"meta":{{"version":"1.0","size":{{"w":64,"h":16}},"scale":"1"}}}}"#,
            entries.join(",")
        );
        std::fs::write(path, json).unwrap();
    }

    #[tokio::test]
    async fn standalone_sprite_synthesizes_a_grid() {
        let dir = tempfile::tempdir().unwrap();
        let texture_path = dir.path().join("strip.png");
        write_png(&texture_path, 64, 16);

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let mut loader = SpriteLoader::new(texture_path.to_str().unwrap())
            .with_number_of_frames(4)
            .with_on_load(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            });
        assert_eq!(loader.state(), LoaderState::Idle);

        let sprite = loader.load(&viewport()).await.unwrap();

        assert_eq!(sprite.texture.width(), 64);
        assert_eq!(sprite.texture.height(), 16);
        let FrameIndex::Flat(frames) = &sprite.sheet.frames else {
            panic!("expected a flat index");
        };
        assert_eq!(frames.len(), 4);
        let xs: Vec<f32> = frames.iter().map(|f| f.frame.x).collect();
        assert_eq!(xs, [0.0, 16.0, 32.0, 48.0]);

        assert_eq!(loader.state(), LoaderState::Ready);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn uneven_grid_loads_with_zero_frames() {
        let dir = tempfile::tempdir().unwrap();
        let texture_path = dir.path().join("strip.png");
        write_png(&texture_path, 64, 16);

        let mut loader =
            SpriteLoader::new(texture_path.to_str().unwrap()).with_number_of_frames(5);
        let sprite = loader.load(&viewport()).await.unwrap();

        // 64 % 5 != 0: the load succeeds but indexes nothing.
        assert_eq!(sprite.total_frames(), 0);
        assert_eq!(loader.state(), LoaderState::Ready);
    }

    #[tokio::test]
    async fn descriptor_and_texture_join_into_animation_groups() {
        let dir = tempfile::tempdir().unwrap();
        let texture_path = dir.path().join("atlas.png");
        let descriptor_path = dir.path().join("atlas.json");
        write_png(&texture_path, 64, 16);
        write_keyed_descriptor(
            &descriptor_path,
            &["walk_01", "walk_02", "jump_01", "idle_01"],
        );

        let mut loader = SpriteLoader::new(texture_path.to_str().unwrap())
            .with_descriptor_url(descriptor_path.to_str().unwrap())
            .with_animation_names(vec!["walk".to_string(), "jump".to_string()]);
        let sprite = loader.load(&viewport()).await.unwrap();

        assert_eq!(sprite.sheet.frames.group("walk").unwrap().len(), 2);
        assert_eq!(sprite.sheet.frames.group("jump").unwrap().len(), 1);
        assert_eq!(sprite.sheet.meta.version.as_deref(), Some("1.0"));
        assert!(sprite.aspect[0] > 0.0 && sprite.aspect[0] <= 1.0);
        assert!(sprite.aspect[1] > 0.0 && sprite.aspect[1] <= 1.0);
    }

    #[tokio::test]
    async fn array_descriptor_yields_a_flat_index() {
        let dir = tempfile::tempdir().unwrap();
        let texture_path = dir.path().join("atlas.png");
        let descriptor_path = dir.path().join("atlas.json");
        write_png(&texture_path, 192, 64);
        let json = r#"{"frames":[
            {"frame":{"x":0,"y":0,"w":64,"h":64},"sourceSize":{"w":64,"h":64}},
            {"frame":{"x":64,"y":0,"w":64,"h":64},"sourceSize":{"w":64,"h":64}},
            {"frame":{"x":128,"y":0,"w":64,"h":64},"sourceSize":{"w":64,"h":64}}
        ],"meta":{"size":{"w":192,"h":64},"scale":"1"}}"#;
        std::fs::write(&descriptor_path, json).unwrap();

        let mut loader = SpriteLoader::new(texture_path.to_str().unwrap())
            .with_descriptor_url(descriptor_path.to_str().unwrap());
        let sprite = loader.load(&viewport()).await.unwrap();

        assert_eq!(sprite.total_frames(), 3);
        assert!(matches!(&sprite.sheet.frames, FrameIndex::Flat(f) if f.len() == 3));
        assert!(sprite.aspect[0] > 0.0 && sprite.aspect[0] <= 1.0);
        assert!(sprite.aspect[1] > 0.0 && sprite.aspect[1] <= 1.0);
    }

    #[tokio::test]
    async fn failure_keeps_loading_state_and_skips_the_callback() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.png");

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let mut loader = SpriteLoader::new(missing.to_str().unwrap()).with_on_load(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        assert!(loader.load(&viewport()).await.is_err());

        // The join never resolved: no callback, no sprite, still loading.
        assert_eq!(loader.state(), LoaderState::Loading);
        assert!(loader.sprite().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn descriptor_failure_fails_the_whole_join() {
        let dir = tempfile::tempdir().unwrap();
        let texture_path = dir.path().join("atlas.png");
        write_png(&texture_path, 64, 16);

        let mut loader = SpriteLoader::new(texture_path.to_str().unwrap())
            .with_descriptor_url(dir.path().join("missing.json").to_str().unwrap());

        assert!(loader.load(&viewport()).await.is_err());
        assert!(loader.sprite().is_none());
    }

    #[tokio::test]
    async fn texture_cache_dedupes_by_url() {
        let dir = tempfile::tempdir().unwrap();
        let texture_path = dir.path().join("shared.png");
        write_png(&texture_path, 32, 32);
        let url = texture_path.to_str().unwrap().to_string();

        let mut a = SpriteLoader::new(&url);
        let mut b = SpriteLoader::new(&url);
        let tex_a = a.load(&viewport()).await.unwrap().texture.clone();
        let tex_b = b.load(&viewport()).await.unwrap().texture.clone();

        assert!(Arc::ptr_eq(&tex_a, &tex_b));
    }

    #[tokio::test]
    async fn clear_evicts_and_forces_a_fresh_decode() {
        let dir = tempfile::tempdir().unwrap();
        let texture_path = dir.path().join("evicted.png");
        write_png(&texture_path, 32, 32);
        let url = texture_path.to_str().unwrap().to_string();

        let mut loader = SpriteLoader::new(&url);
        let first = loader.load(&viewport()).await.unwrap().texture.clone();

        clear(&url);

        let mut again = SpriteLoader::new(&url);
        let second = again.load(&viewport()).await.unwrap().texture.clone();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn dispose_releases_the_current_cache_entry() {
        let dir = tempfile::tempdir().unwrap();
        let texture_path = dir.path().join("disposed.png");
        write_png(&texture_path, 32, 32);
        let url = texture_path.to_str().unwrap().to_string();

        let mut loader = SpriteLoader::new(&url);
        let first = loader.load(&viewport()).await.unwrap().texture.clone();
        loader.dispose();

        let mut again = SpriteLoader::new(&url);
        let second = again.load(&viewport()).await.unwrap().texture.clone();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn preload_warms_the_cache() {
        let dir = tempfile::tempdir().unwrap();
        let texture_path = dir.path().join("warm.png");
        write_png(&texture_path, 32, 32);
        let url = texture_path.to_str().unwrap().to_string();

        preload(&url).await.unwrap();

        let mut loader = SpriteLoader::new(&url);
        let sprite = loader.load(&viewport()).await.unwrap();
        assert_eq!(sprite.texture.width(), 32);
    }

    #[tokio::test]
    async fn reload_rebinds_urls_and_keeps_the_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let first_path = dir.path().join("first.png");
        let second_path = dir.path().join("second.png");
        write_png(&first_path, 64, 16);
        write_png(&second_path, 128, 32);

        let mut loader =
            SpriteLoader::new(first_path.to_str().unwrap()).with_number_of_frames(4);
        let first = loader.load(&viewport()).await.unwrap();
        assert_eq!(first.texture.width(), 64);

        let second = loader
            .reload(second_path.to_str().unwrap(), None, &viewport())
            .await
            .unwrap();

        // New texture, same bound frame count: 128 / 4 = 32px columns.
        assert_eq!(second.texture.width(), 128);
        assert_eq!(second.total_frames(), 4);
        assert_eq!(loader.state(), LoaderState::Ready);
    }

    #[tokio::test]
    async fn file_scheme_prefix_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let texture_path = dir.path().join("scheme.png");
        write_png(&texture_path, 16, 16);
        let url = format!("file://{}", texture_path.to_str().unwrap());

        let mut loader = SpriteLoader::new(url);
        let sprite = loader.load(&viewport()).await.unwrap();
        assert_eq!(sprite.texture.width(), 16);
    }
}
