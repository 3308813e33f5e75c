use std::{io, time::Duration};

use life_common::Board;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Requests coming from the keyboard while the simulation runs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Signal {
    Save,
    Quit,
}

#[derive(Debug)]
pub enum Outcome {
    /// Save was requested; the board is exactly what was drawn last.
    Save(Board),
    Quit(Board),
    /// The generation limit was reached.
    Finished(Board),
}

pub trait Screen {
    fn draw(&mut self, board: &Board) -> io::Result<()>;
}

/// Draws and advances `board` once per `interval` until a signal or the
/// generation limit ends the run. This loop is the board's only writer.
pub async fn run<S>(
    mut board: Board,
    screen: &mut S,
    signals: &mut mpsc::UnboundedReceiver<Signal>,
    interval: Duration,
    limit: Option<u32>,
) -> io::Result<Outcome>
where
    S: Screen,
{
    debug!(?interval, ?limit, "starting simulation loop");
    let mut save_requested = false;
    loop {
        screen.draw(&board)?;
        if save_requested {
            info!(generation = board.generation().get(), "save requested");
            return Ok(Outcome::Save(board));
        }
        if limit.map_or(false, |limit| board.generation().get() >= limit) {
            info!(generation = board.generation().get(), "generation limit reached");
            return Ok(Outcome::Finished(board));
        }

        board.advance();

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            signal = signals.recv() => match signal {
                Some(Signal::Save) => save_requested = true,
                Some(Signal::Quit) | None => {
                    info!(generation = board.generation().get(), "quit");
                    return Ok(Outcome::Quit(board));
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use life_common::Position;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<(u32, String)>,
    }

    impl Screen for Recorder {
        fn draw(&mut self, board: &Board) -> io::Result<()> {
            self.frames.push((board.generation().get(), board.render()));
            Ok(())
        }
    }

    fn blinker() -> Board {
        let mut board = Board::from_matrix(vec![vec![false; 5]; 5]).unwrap();
        for column in 1..4 {
            board.set(Position::new(column, 2), true).unwrap();
        }
        board
    }

    const TICK: Duration = Duration::from_millis(1);

    #[tokio::test]
    async fn save_returns_the_last_drawn_board() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send(Signal::Save).unwrap();
        let mut screen = Recorder::default();

        let outcome = run(blinker(), &mut screen, &mut rx, TICK, None).await.unwrap();
        let board = match outcome {
            Outcome::Save(board) => board,
            other => panic!("unexpected outcome {:?}", other),
        };
        assert_eq!(board.generation().get(), 1);
        let (generation, frame) = screen.frames.last().unwrap();
        assert_eq!(*generation, 1);
        assert_eq!(*frame, board.render());
    }

    #[tokio::test]
    async fn stops_at_generation_limit() {
        let (_tx, mut rx) = mpsc::unbounded_channel();
        let mut screen = Recorder::default();

        let outcome = run(blinker(), &mut screen, &mut rx, TICK, Some(3)).await.unwrap();
        match outcome {
            Outcome::Finished(board) => assert_eq!(board.generation().get(), 3),
            other => panic!("unexpected outcome {:?}", other),
        }
        let generations: Vec<u32> = screen.frames.iter().map(|(g, _)| *g).collect();
        assert_eq!(generations, vec![0, 1, 2, 3]);
        assert_eq!(screen.frames[0].1, screen.frames[2].1);
    }

    #[tokio::test]
    async fn closed_channel_quits() {
        let (tx, mut rx) = mpsc::unbounded_channel::<Signal>();
        drop(tx);
        let mut screen = Recorder::default();

        let outcome = run(blinker(), &mut screen, &mut rx, TICK, None).await.unwrap();
        assert!(matches!(outcome, Outcome::Quit(_)));
        assert_eq!(screen.frames.len(), 1);
    }
}
