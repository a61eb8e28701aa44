use keepsake::{
    MediaSource, Millis, Point, Progress, RecordingEmitter, SceneId, Session, SessionOpts,
    Storyboard,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let s = include_str!("../tests/data/storyboards/birthday.json");
    let board = Storyboard::from_reader(s.as_bytes())?;

    let emitter = RecordingEmitter::new();
    let mut session = Session::new(&board, SessionOpts::default())?.with_emitter(emitter.clone());

    session.advance(Millis(0));
    session.advance(Millis(2000));
    session.set_progress(Progress::new(0.2), Millis(2100));

    let photos = (0..5)
        .map(|i| MediaSource::from_bytes(vec![i; 32]))
        .collect();
    session.add_photos(photos, Millis(2600))?;
    session.advance(Millis(3100));

    session.set_anchor_visible(SceneId::Memories, true, Millis(3200));
    session.advance(Millis(5200));

    session.set_progress(Progress::new(0.7), Millis(5300));
    session.advance(Millis(11300));
    session.advance(Millis(13800));

    session.attach_scratch_surface(20, 20)?;
    session.scratch_pointer_down(Point::new(10.0, 10.0), Millis(13900));
    session.scratch_pointer_up();
    session.cut_cake(Millis(14000));

    session.set_anchor_visible(SceneId::FinalWish, true, Millis(14100));
    session.advance(Millis(21200));

    for event in session.drain_events() {
        println!("{event:?}");
    }
    println!("bursts emitted: {}", emitter.count());

    Ok(())
}
