#[cfg(test)]
mod tests {
    use crate::scene::{Scene, SceneError, Transform};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn add_child_sets_parent_and_child_list() {
        let mut scene = Scene::new();

        let p = scene.add_node(Transform::default());
        let c = scene.add_child(p, Transform::default()).unwrap();

        assert_eq!(scene.parent_of(c), Some(p));
        assert!(scene.children_of(p).contains(&c));
    }

    #[test]
    fn set_parent_none_detaches() {
        let mut scene = Scene::new();

        let p = scene.add_node(Transform::default());
        let c = scene.add_child(p, Transform::default()).unwrap();

        scene.set_parent(c, None).unwrap();

        assert_eq!(scene.parent_of(c), None);
        assert!(!scene.children_of(p).contains(&c));
    }

    #[test]
    fn prevent_cycles() {
        let mut scene = Scene::new();

        let a = scene.add_node(Transform::default());
        let b = scene.add_child(a, Transform::default()).unwrap();

        // Can't make an ancestor a child of its descendant.
        assert_eq!(scene.set_parent(a, Some(b)), Err(SceneError::WouldCycle));
        assert_eq!(scene.set_parent(a, Some(a)), Err(SceneError::WouldCycle));
    }

    #[test]
    fn remove_subtree_deletes_descendants() {
        let mut scene = Scene::new();

        let root = scene.add_node(Transform::default());
        let child = scene.add_child(root, Transform::default()).unwrap();
        let grandchild = scene.add_child(child, Transform::default()).unwrap();

        assert!(scene.remove_subtree(root));

        assert!(!scene.contains(root));
        assert!(!scene.contains(child));
        assert!(!scene.contains(grandchild));
        assert!(scene.is_empty());
    }

    #[test]
    fn stale_key_resolves_to_nothing() {
        let mut scene = Scene::new();

        let n = scene.add_node(Transform::default());
        scene.remove_subtree(n);

        assert!(scene.transform(n).is_none());
        assert!(scene.world_position(n).is_none());
        assert!(!scene.set_scale_uniform(n, 2.0));
    }

    #[test]
    fn world_position_composes_parent_trs() {
        let mut scene = Scene::new();

        // Parent: translate (1, 0, 0), rotate 90 degrees about +Z, scale 2.
        let half_sqrt2 = std::f32::consts::FRAC_1_SQRT_2;
        let parent = scene.add_node(Transform {
            translation: [1.0, 0.0, 0.0],
            rotation: [0.0, 0.0, half_sqrt2, half_sqrt2],
            scale: [2.0, 2.0, 2.0],
        });
        let child = scene
            .add_child(parent, Transform::from_translation([1.0, 0.0, 0.0]))
            .unwrap();

        // Local (1, 0, 0) scales to (2, 0, 0), rotates to (0, 2, 0), then
        // translates to (1, 2, 0).
        let pos = scene.world_position(child).unwrap();
        assert!(approx(pos[0], 1.0), "x = {}", pos[0]);
        assert!(approx(pos[1], 2.0), "y = {}", pos[1]);
        assert!(approx(pos[2], 0.0), "z = {}", pos[2]);
    }

    #[test]
    fn world_position_into_matches_chain_of_translations() {
        let mut scene = Scene::new();

        let a = scene.add_node(Transform::from_translation([1.0, 2.0, 3.0]));
        let b = scene
            .add_child(a, Transform::from_translation([10.0, 0.0, 0.0]))
            .unwrap();

        let mut out = [0.0; 3];
        assert!(scene.world_position_into(b, &mut out));
        assert_eq!(out, [11.0, 2.0, 3.0]);
    }
}
