use raypick::glam::Vec3;
use raypick::{
    new_scene, Aabb, Camera, Canvas, ExclusiveSelectionGroup, HandlerRef, InteractionEventKind,
    InteractionHandler, Material, MaterialSlot, MaterialSlots, MaterialStateSet, NodeId,
    PointerEventRouter, RouterOptions, SharedScene, StateMaterial, Ticker, Value,
};
use raypick_testkit::PointerScript;
use std::cell::Cell;
use std::rc::Rc;

fn slot(label: &str) -> StateMaterial {
    StateMaterial::new(Material::new(label, [1.0; 4]))
}

fn switch_materials() -> MaterialStateSet {
    MaterialStateSet::new(
        MaterialSlots::with_normal(slot("idle"))
            .with(MaterialSlot::Over, slot("hover"))
            .with(MaterialSlot::Down, slot("pressed"))
            .with(MaterialSlot::Disable, slot("off"))
            .with(MaterialSlot::NormalSelect, slot("on"))
            .with(MaterialSlot::OverSelect, slot("on_hover"))
            .with(MaterialSlot::DownSelect, slot("on_pressed")),
    )
    .expect("normal slot supplied")
}

struct Panel {
    scene: SharedScene,
    ticker: Rc<Ticker>,
    router: PointerEventRouter,
    panel: HandlerRef,
    radios: Vec<HandlerRef>,
    checkbox: HandlerRef,
    group: Rc<ExclusiveSelectionGroup>,
    panel_clicks: Rc<Cell<usize>>,
}

fn mesh(scene: &SharedScene, parent: NodeId, name: &str, at: Vec3) -> NodeId {
    let mut s = scene.borrow_mut();
    let id = s
        .add_mesh(parent, name, Aabb::from_center_size(Vec3::ZERO, Vec3::splat(2.0)), None)
        .unwrap();
    s.set_translation(id, at).unwrap();
    id
}

// Three radios along y = 0 (pixels x = 20, 50, 80) and a checkbox below the
// middle one (pixel y = 80), all inside a panel that itself has a handler.
fn panel() -> Panel {
    let scene = new_scene();
    let panel_node = {
        let mut s = scene.borrow_mut();
        let root = s.root();
        s.add_group(root, "panel").unwrap()
    };
    let radios: Vec<HandlerRef> = [("low", -3.0), ("mid", 0.0), ("high", 3.0)]
        .into_iter()
        .map(|(value, x)| {
            let node = mesh(&scene, panel_node, value, Vec3::new(x, 0.0, 0.0));
            InteractionHandler::radio(&scene, node, Some(switch_materials()), value).unwrap()
        })
        .collect();
    let checkbox_node = mesh(&scene, panel_node, "mute", Vec3::new(0.0, -3.0, 0.0));
    let checkbox =
        InteractionHandler::checkbox(&scene, checkbox_node, Some(switch_materials())).unwrap();
    let panel = InteractionHandler::button(&scene, panel_node, None).unwrap();

    let panel_clicks = Rc::new(Cell::new(0));
    let counter = Rc::clone(&panel_clicks);
    panel.on(InteractionEventKind::Click, move |_| {
        counter.set(counter.get() + 1)
    });

    let group = ExclusiveSelectionGroup::with_handlers(&radios).unwrap();
    let ticker = Ticker::new();
    let router = PointerEventRouter::new(
        &scene,
        Camera::orthographic(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, 5.0, 5.0, 100.0),
        Canvas::new(200.0, 200.0).with_style_size(100.0, 100.0),
        &ticker,
        RouterOptions::default(),
    );

    Panel {
        scene,
        ticker,
        router,
        panel,
        radios,
        checkbox,
        group,
        panel_clicks,
    }
}

impl Panel {
    fn play(&mut self, script: PointerScript) {
        script.play(&self.ticker, &mut self.router);
    }

    fn label(&self, handler: &HandlerRef) -> String {
        let scene = self.scene.borrow();
        let resource = scene.resource(handler.node()).expect("material assigned");
        let label = resource.materials()[0].borrow().label.clone();
        label
    }

    fn labels(&self) -> Vec<String> {
        self.radios.iter().map(|r| self.label(r)).collect()
    }
}

#[test]
fn clicking_radios_moves_the_selection() {
    let mut p = panel();
    assert_eq!(p.labels(), ["idle", "idle", "idle"]);

    p.play(PointerScript::new().click_at(20.0, 50.0));
    assert_eq!(p.labels(), ["on", "idle", "idle"]);
    assert_eq!(p.group.selected_value(), Some(Value::from("low")));
    assert!(p.radios[0].is_frozen());

    p.play(PointerScript::new().click_at(80.0, 50.0));
    assert_eq!(p.labels(), ["idle", "idle", "on"]);
    assert_eq!(p.group.selected_value(), Some(Value::from("high")));
    assert!(!p.radios[0].is_frozen());

    // The selected radio is locked; its click still bubbles to the panel.
    p.play(PointerScript::new().click_at(80.0, 50.0));
    assert_eq!(p.radios[2].is_selected(), Ok(true));
    assert_eq!(p.panel_clicks.get(), 3);
}

#[test]
fn hover_and_press_materials_follow_the_pointer() {
    let mut p = panel();

    p.play(PointerScript::new().move_to(50.0, 50.0));
    assert_eq!(p.labels(), ["idle", "hover", "idle"]);

    p.play(PointerScript::new().event(raypick::PointerEvent::down(50.0, 50.0)));
    assert_eq!(p.label(&p.radios[1]), "pressed");

    p.play(PointerScript::new().event(raypick::PointerEvent::up(50.0, 50.0)));
    assert_eq!(p.label(&p.radios[1]), "on_hover");

    // Leaving a locked radio does not change its state.
    p.play(PointerScript::new().wait(33.0).move_to(50.0, 5.0));
    assert!(!p.radios[1].is_over());
    assert_eq!(p.label(&p.radios[1]), "on_hover");
    assert!(p.router.current_over().is_empty());
}

#[test]
fn checkbox_toggles_independently_of_the_group() {
    let mut p = panel();

    p.play(PointerScript::new().click_at(50.0, 80.0));
    assert_eq!(p.checkbox.is_selected(), Ok(true));
    assert_eq!(p.label(&p.checkbox), "on");
    assert!(p.group.selected().is_none());

    p.checkbox.set_alpha(0.5);
    let opacity = p
        .scene
        .borrow()
        .resource(p.checkbox.node())
        .unwrap()
        .opacities()[0];
    assert!((opacity - 0.5).abs() < 1e-6);

    p.play(PointerScript::new().click_at(50.0, 80.0));
    assert_eq!(p.checkbox.is_selected(), Ok(false));
    assert_eq!(p.label(&p.checkbox), "idle");
}

#[test]
fn disabled_panel_gates_bubbling_but_not_children() {
    let mut p = panel();
    p.panel.disable();

    p.play(PointerScript::new().click_at(20.0, 50.0));
    assert_eq!(p.radios[0].is_selected(), Ok(true));
    assert_eq!(p.panel_clicks.get(), 0);

    p.panel.enable();
    p.radios[1].disable();
    assert_eq!(p.label(&p.radios[1]), "off");

    p.play(PointerScript::new().click_at(50.0, 50.0));
    assert_eq!(p.radios[1].is_selected(), Ok(false));
    assert_eq!(p.group.selected_value(), Some(Value::from("low")));
    assert_eq!(p.panel_clicks.get(), 0);
}

#[test]
fn clicking_outside_every_object_does_nothing() {
    let mut p = panel();
    p.play(PointerScript::new().click_at(5.0, 5.0));
    assert_eq!(p.panel_clicks.get(), 0);
    assert!(p.group.selected().is_none());
}
