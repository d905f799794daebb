//! The scene: per-family component pools, the node pool, and the view node.

use slotmap::SlotMap;

use crate::scene::{
    BoundingVolume, Camera, CameraKey, ComponentFamily, ComponentKey, ComponentKind, Geometry,
    GeometryKey, Light, LightKey, Material, MaterialKey, Node, NodeKey, VolumeKey,
    NODE_LIST_CAPACITY,
};

/// Declared pool capacities. Exhausting a pool is a programming error and
/// fatal; every pool defaults to 64 slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneCapacities {
    /// Maximum number of nodes.
    pub nodes: usize,
    /// Maximum number of camera components.
    pub cameras: usize,
    /// Maximum number of bounding-volume components.
    pub bounding_volumes: usize,
    /// Maximum number of geometry components.
    pub geometries: usize,
    /// Maximum number of light components.
    pub lights: usize,
    /// Maximum number of material components.
    pub materials: usize,
}

impl Default for SceneCapacities {
    fn default() -> Self {
        Self {
            nodes: 64,
            cameras: 64,
            bounding_volumes: 64,
            geometries: 64,
            lights: 64,
            materials: 64,
        }
    }
}

/// The scene owns every node and component; nodes reference components by
/// key. Populated single-threaded by the loader, then shared read-only with
/// the renderer for the lifetime of the draw loop. Dropping the scene frees
/// all pools.
#[derive(Debug)]
pub struct Scene {
    capacities: SceneCapacities,
    nodes: SlotMap<NodeKey, Node>,
    /// Nodes not attached as a child of any other node, in creation order.
    /// Traversal starts here.
    roots: Vec<NodeKey>,
    cameras: SlotMap<CameraKey, Camera>,
    bounding_volumes: SlotMap<VolumeKey, BoundingVolume>,
    geometries: SlotMap<GeometryKey, Geometry>,
    lights: SlotMap<LightKey, Light>,
    materials: SlotMap<MaterialKey, Material>,
    view: Option<NodeKey>,
}

impl Scene {
    /// Create an empty scene with default capacities.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacities(SceneCapacities::default())
    }

    /// Create an empty scene with the given pool capacities.
    #[must_use]
    pub fn with_capacities(capacities: SceneCapacities) -> Self {
        Self {
            capacities,
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
            cameras: SlotMap::with_key(),
            bounding_volumes: SlotMap::with_key(),
            geometries: SlotMap::with_key(),
            lights: SlotMap::with_key(),
            materials: SlotMap::with_key(),
            view: None,
        }
    }

    // ------------------------------------------------------------------
    // Nodes
    // ------------------------------------------------------------------

    /// Create a node at the origin and add it to the root set.
    ///
    /// # Panics
    ///
    /// When the node pool is exhausted.
    pub fn create_node(&mut self) -> NodeKey {
        assert!(
            self.nodes.len() < self.capacities.nodes,
            "node pool exhausted (capacity {})",
            self.capacities.nodes
        );
        let key = self.nodes.insert(Node::new());
        self.roots.push(key);
        key
    }

    /// Destroy a node. Its attached components stay alive in their pools;
    /// its children return to the root set. A node attached as a child
    /// must be detached from its parent first.
    pub fn destroy_node(&mut self, key: NodeKey) {
        let Some(node) = self.nodes.remove(key) else {
            return;
        };
        if let Some(i) = self.roots.iter().position(|&k| k == key) {
            let _ = self.roots.remove(i);
        }
        for child in node.children {
            if self.nodes.contains_key(child) {
                self.roots.push(child);
            }
        }
    }

    /// Read access to a node.
    #[inline]
    #[must_use]
    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Write access to a node.
    #[inline]
    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    /// Number of live nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Designate the node the renderer reads its camera from.
    ///
    /// # Panics
    ///
    /// When `key` does not name a live node.
    pub fn set_view(&mut self, key: NodeKey) {
        assert!(self.nodes.contains_key(key), "view node does not exist");
        self.view = Some(key);
    }

    /// The current view node, if one has been designated.
    #[inline]
    #[must_use]
    pub fn view(&self) -> Option<NodeKey> {
        self.view
    }

    // ------------------------------------------------------------------
    // Component pools
    // ------------------------------------------------------------------

    /// Allocate a default-initialized component in the given family's pool.
    ///
    /// The payload starts as the family's zero variant (ball of radius 0,
    /// black ambient light, ...), mirroring zero-initialized acquisition;
    /// callers configure it through the `*_mut` accessors.
    ///
    /// # Panics
    ///
    /// When the family pool is exhausted.
    pub fn acquire_component(&mut self, family: ComponentFamily) -> ComponentKey {
        match family {
            ComponentFamily::Camera => ComponentKey::Camera(self.acquire_camera(Camera::default())),
            ComponentFamily::BoundingVolume => {
                ComponentKey::BoundingVolume(self.acquire_bounding_volume(BoundingVolume::default()))
            }
            ComponentFamily::Geometry => {
                ComponentKey::Geometry(self.acquire_geometry(Geometry::default()))
            }
            ComponentFamily::Light => ComponentKey::Light(self.acquire_light(Light::default())),
            ComponentFamily::Material => {
                ComponentKey::Material(self.acquire_material(Material::default()))
            }
        }
    }

    /// Remove a component from its family pool.
    ///
    /// Nodes still referencing the key simply stop finding it; releasing
    /// does not touch any node's attached list.
    pub fn release_component(&mut self, key: ComponentKey) {
        match key {
            ComponentKey::Camera(k) => {
                let _ = self.cameras.remove(k);
            }
            ComponentKey::BoundingVolume(k) => {
                let _ = self.bounding_volumes.remove(k);
            }
            ComponentKey::Geometry(k) => {
                let _ = self.geometries.remove(k);
            }
            ComponentKey::Light(k) => {
                let _ = self.lights.remove(k);
            }
            ComponentKey::Material(k) => {
                let _ = self.materials.remove(k);
            }
        }
    }

    /// Allocate a camera component.
    ///
    /// # Panics
    ///
    /// When the camera pool is exhausted.
    pub fn acquire_camera(&mut self, camera: Camera) -> CameraKey {
        assert!(
            self.cameras.len() < self.capacities.cameras,
            "camera pool exhausted (capacity {})",
            self.capacities.cameras
        );
        self.cameras.insert(camera)
    }

    /// Allocate a bounding-volume component.
    ///
    /// # Panics
    ///
    /// When the bounding-volume pool is exhausted.
    pub fn acquire_bounding_volume(&mut self, volume: BoundingVolume) -> VolumeKey {
        assert!(
            self.bounding_volumes.len() < self.capacities.bounding_volumes,
            "bounding-volume pool exhausted (capacity {})",
            self.capacities.bounding_volumes
        );
        self.bounding_volumes.insert(volume)
    }

    /// Allocate a geometry component.
    ///
    /// # Panics
    ///
    /// When the geometry pool is exhausted.
    pub fn acquire_geometry(&mut self, geometry: Geometry) -> GeometryKey {
        assert!(
            self.geometries.len() < self.capacities.geometries,
            "geometry pool exhausted (capacity {})",
            self.capacities.geometries
        );
        self.geometries.insert(geometry)
    }

    /// Allocate a light component.
    ///
    /// # Panics
    ///
    /// When the light pool is exhausted.
    pub fn acquire_light(&mut self, light: Light) -> LightKey {
        assert!(
            self.lights.len() < self.capacities.lights,
            "light pool exhausted (capacity {})",
            self.capacities.lights
        );
        self.lights.insert(light)
    }

    /// Allocate a material component.
    ///
    /// # Panics
    ///
    /// When the material pool is exhausted.
    pub fn acquire_material(&mut self, material: Material) -> MaterialKey {
        assert!(
            self.materials.len() < self.capacities.materials,
            "material pool exhausted (capacity {})",
            self.capacities.materials
        );
        self.materials.insert(material)
    }

    /// Read access to a camera payload.
    #[inline]
    #[must_use]
    pub fn camera(&self, key: CameraKey) -> Option<&Camera> {
        self.cameras.get(key)
    }

    /// Write access to a camera payload.
    #[inline]
    pub fn camera_mut(&mut self, key: CameraKey) -> Option<&mut Camera> {
        self.cameras.get_mut(key)
    }

    /// Read access to a bounding-volume payload.
    #[inline]
    #[must_use]
    pub fn bounding_volume(&self, key: VolumeKey) -> Option<&BoundingVolume> {
        self.bounding_volumes.get(key)
    }

    /// Write access to a bounding-volume payload.
    #[inline]
    pub fn bounding_volume_mut(&mut self, key: VolumeKey) -> Option<&mut BoundingVolume> {
        self.bounding_volumes.get_mut(key)
    }

    /// Read access to a geometry payload.
    #[inline]
    #[must_use]
    pub fn geometry(&self, key: GeometryKey) -> Option<&Geometry> {
        self.geometries.get(key)
    }

    /// Write access to a geometry payload.
    #[inline]
    pub fn geometry_mut(&mut self, key: GeometryKey) -> Option<&mut Geometry> {
        self.geometries.get_mut(key)
    }

    /// Read access to a light payload.
    #[inline]
    #[must_use]
    pub fn light(&self, key: LightKey) -> Option<&Light> {
        self.lights.get(key)
    }

    /// Write access to a light payload.
    #[inline]
    pub fn light_mut(&mut self, key: LightKey) -> Option<&mut Light> {
        self.lights.get_mut(key)
    }

    /// Read access to a material payload.
    #[inline]
    #[must_use]
    pub fn material(&self, key: MaterialKey) -> Option<&Material> {
        self.materials.get(key)
    }

    /// Write access to a material payload.
    #[inline]
    pub fn material_mut(&mut self, key: MaterialKey) -> Option<&mut Material> {
        self.materials.get_mut(key)
    }

    /// The (family, variant) pair of a live component, if the key resolves.
    #[must_use]
    pub fn component_kind(&self, key: ComponentKey) -> Option<ComponentKind> {
        match key {
            ComponentKey::Camera(k) => self
                .cameras
                .get(k)
                .map(|c| ComponentKind::Camera(c.projection.kind())),
            ComponentKey::BoundingVolume(k) => self
                .bounding_volumes
                .get(k)
                .map(|v| ComponentKind::BoundingVolume(v.kind())),
            ComponentKey::Geometry(k) => self
                .geometries
                .get(k)
                .map(|g| ComponentKind::Geometry(g.kind())),
            ComponentKey::Light(k) => self.lights.get(k).map(|l| ComponentKind::Light(l.kind())),
            ComponentKey::Material(k) => self
                .materials
                .get(k)
                .map(|m| ComponentKind::Material(m.kind())),
        }
    }

    // ------------------------------------------------------------------
    // Attachment
    // ------------------------------------------------------------------

    /// Attach a component to a node's component list.
    ///
    /// # Panics
    ///
    /// When the node does not exist or its attached list is full.
    pub fn attach_component(&mut self, node: NodeKey, component: ComponentKey) {
        let Some(n) = self.nodes.get_mut(node) else {
            panic!("attach_component: node does not exist");
        };
        assert!(
            n.components.len() < NODE_LIST_CAPACITY,
            "node component list full (capacity {NODE_LIST_CAPACITY})"
        );
        n.components.push(component);
    }

    /// Detach a component from a node's list (swap-remove; order within the
    /// list is not significant). The component stays alive in its pool.
    pub fn detach_component(&mut self, node: NodeKey, component: ComponentKey) {
        if let Some(n) = self.nodes.get_mut(node) {
            if let Some(i) = n.components.iter().position(|&c| c == component) {
                let _ = n.components.swap_remove(i);
            }
        }
    }

    /// Attach `child` under `parent`, removing it from the root set.
    ///
    /// # Panics
    ///
    /// When either node does not exist, when `parent == child`, or when the
    /// parent's child list is full.
    pub fn attach_child(&mut self, parent: NodeKey, child: NodeKey) {
        assert_ne!(parent, child, "attach_child: node cannot be its own child");
        assert!(
            self.nodes.contains_key(child),
            "attach_child: child does not exist"
        );
        let Some(p) = self.nodes.get_mut(parent) else {
            panic!("attach_child: parent does not exist");
        };
        assert!(
            p.children.len() < NODE_LIST_CAPACITY,
            "node child list full (capacity {NODE_LIST_CAPACITY})"
        );
        p.children.push(child);
        if let Some(i) = self.roots.iter().position(|&k| k == child) {
            let _ = self.roots.remove(i);
        }
    }

    /// Detach `child` from `parent` (swap-remove), returning it to the root
    /// set.
    pub fn detach_child(&mut self, parent: NodeKey, child: NodeKey) {
        let Some(p) = self.nodes.get_mut(parent) else {
            return;
        };
        if let Some(i) = p.children.iter().position(|&k| k == child) {
            let _ = p.children.swap_remove(i);
            self.roots.push(child);
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// First attached component of the given family, in attach order.
    #[must_use]
    pub fn find_any_component(
        &self,
        node: NodeKey,
        family: ComponentFamily,
    ) -> Option<ComponentKey> {
        let n = self.nodes.get(node)?;
        n.components.iter().copied().find(|c| c.family() == family)
    }

    /// First attached component matching the given (family, variant) pair.
    #[must_use]
    pub fn find_component(&self, node: NodeKey, kind: ComponentKind) -> Option<ComponentKey> {
        let n = self.nodes.get(node)?;
        n.components
            .iter()
            .copied()
            .find(|&c| self.component_kind(c) == Some(kind))
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    /// Visit every node reachable from the root set in post-order: all of a
    /// node's children are visited strictly before the node itself.
    pub fn traverse(&self, visitor: &mut dyn FnMut(NodeKey, &Node)) {
        for &root in &self.roots {
            self.traverse_from(root, visitor);
        }
    }

    fn traverse_from(&self, key: NodeKey, visitor: &mut dyn FnMut(NodeKey, &Node)) {
        let Some(node) = self.nodes.get(key) else {
            return;
        };
        for &child in &node.children {
            self.traverse_from(child, visitor);
        }
        visitor(key, node);
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{MaterialKind, VolumeKind};
    use glam::Vec4;

    #[test]
    fn traversal_visits_children_before_parents() {
        let mut scene = Scene::new();
        let root = scene.create_node();
        let a = scene.create_node();
        let b = scene.create_node();
        let a1 = scene.create_node();
        let a2 = scene.create_node();
        scene.attach_child(root, a);
        scene.attach_child(root, b);
        scene.attach_child(a, a1);
        scene.attach_child(a, a2);

        let mut order = Vec::new();
        scene.traverse(&mut |key, _| order.push(key));

        assert_eq!(order.len(), 5, "every node is visited exactly once");
        let pos = |k| order.iter().position(|&o| o == k).expect("visited");
        assert!(pos(a1) < pos(a));
        assert!(pos(a2) < pos(a));
        assert!(pos(a) < pos(root));
        assert!(pos(b) < pos(root));
    }

    #[test]
    fn attach_detach_component_roundtrip() {
        let mut scene = Scene::new();
        let node = scene.create_node();
        let light = ComponentKey::Light(scene.acquire_light(Light::Ambient {
            color: Vec4::ONE,
        }));

        scene.attach_component(node, light);
        assert_eq!(
            scene.find_any_component(node, ComponentFamily::Light),
            Some(light)
        );

        scene.detach_component(node, light);
        assert_eq!(scene.find_any_component(node, ComponentFamily::Light), None);

        // The component itself outlives the detach.
        let ComponentKey::Light(key) = light else {
            unreachable!()
        };
        assert!(scene.light(key).is_some());
    }

    #[test]
    fn find_component_matches_family_and_variant() {
        let mut scene = Scene::new();
        let node = scene.create_node();
        let ball = ComponentKey::BoundingVolume(
            scene.acquire_bounding_volume(BoundingVolume::Ball { radius: 1.0 }),
        );
        let ray = ComponentKey::BoundingVolume(scene.acquire_bounding_volume(
            BoundingVolume::Ray {
                direction: Vec4::new(0.0, 0.0, -1.0, 0.0),
            },
        ));
        scene.attach_component(node, ball);
        scene.attach_component(node, ray);

        assert_eq!(
            scene.find_component(node, ComponentKind::BoundingVolume(VolumeKind::Ray)),
            Some(ray)
        );
        assert_eq!(
            scene.find_component(node, ComponentKind::BoundingVolume(VolumeKind::Ball)),
            Some(ball)
        );
        assert_eq!(
            scene.find_component(node, ComponentKind::BoundingVolume(VolumeKind::Box)),
            None
        );
    }

    #[test]
    fn released_component_stops_resolving() {
        let mut scene = Scene::new();
        let node = scene.create_node();
        let key = scene.acquire_material(Material::default());
        scene.attach_component(node, ComponentKey::Material(key));

        scene.release_component(ComponentKey::Material(key));
        assert!(scene.material(key).is_none());
        // The stale key no longer matches any kind query.
        assert_eq!(
            scene.find_component(node, ComponentKind::Material(MaterialKind::Constant)),
            None
        );
    }

    #[test]
    fn detach_child_returns_node_to_roots() {
        let mut scene = Scene::new();
        let parent = scene.create_node();
        let child = scene.create_node();
        scene.attach_child(parent, child);

        let mut visited = Vec::new();
        scene.traverse(&mut |key, _| visited.push(key));
        assert_eq!(visited, vec![child, parent]);

        scene.detach_child(parent, child);
        visited.clear();
        scene.traverse(&mut |key, _| visited.push(key));
        assert_eq!(visited.len(), 2);
        assert!(scene.node(parent).expect("parent").children().is_empty());
    }

    #[test]
    fn destroy_node_orphans_children_back_to_roots() {
        let mut scene = Scene::new();
        let parent = scene.create_node();
        let child = scene.create_node();
        scene.attach_child(parent, child);

        let material = scene.acquire_material(Material::default());
        scene.attach_component(parent, ComponentKey::Material(material));

        scene.destroy_node(parent);
        assert!(scene.node(parent).is_none());
        // The child survives and is traversed as a root again.
        let mut visited = Vec::new();
        scene.traverse(&mut |key, _| visited.push(key));
        assert_eq!(visited, vec![child]);
        // Components referenced by the destroyed node stay alive.
        assert!(scene.material(material).is_some());
    }

    #[test]
    #[should_panic(expected = "component list full")]
    fn node_component_list_capacity_is_fatal() {
        let mut scene = Scene::with_capacities(SceneCapacities {
            materials: NODE_LIST_CAPACITY + 1,
            ..SceneCapacities::default()
        });
        let node = scene.create_node();
        for _ in 0..=NODE_LIST_CAPACITY {
            let key = scene.acquire_material(Material::default());
            scene.attach_component(node, ComponentKey::Material(key));
        }
    }

    #[test]
    #[should_panic(expected = "pool exhausted")]
    fn pool_exhaustion_is_fatal() {
        let mut scene = Scene::with_capacities(SceneCapacities {
            lights: 1,
            ..SceneCapacities::default()
        });
        let _ = scene.acquire_light(Light::default());
        let _ = scene.acquire_light(Light::default());
    }

    #[test]
    fn acquire_component_uses_zeroed_defaults() {
        let mut scene = Scene::new();
        let key = scene.acquire_component(ComponentFamily::BoundingVolume);
        assert_eq!(key.family(), ComponentFamily::BoundingVolume);
        assert_eq!(
            scene.component_kind(key),
            Some(ComponentKind::BoundingVolume(VolumeKind::Ball))
        );
    }
}
