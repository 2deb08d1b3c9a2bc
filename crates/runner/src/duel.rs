//! Two independent sessions side by side.

use std::io;

use tetris_duo_core::{PieceSource, Session, SessionSnapshot};
use tetris_duo_types::{Command, GameConfig, Player};

use crate::handle::SessionHandle;
use crate::runner::{RunnerHandle, SessionRunner};

/// Two sessions, each on its own worker. Nothing is shared between them
/// beyond the configuration they were built from.
pub struct Duel {
    runners: [RunnerHandle; 2],
}

impl Duel {
    pub fn spawn(config: &GameConfig, one: PieceSource, two: PieceSource) -> io::Result<Self> {
        let first = SessionRunner::spawn_named(
            SessionHandle::new(Session::new(config, one)),
            config,
            "runner-p1",
        )?;
        let second = SessionRunner::spawn_named(
            SessionHandle::new(Session::new(config, two)),
            config,
            "runner-p2",
        )?;
        Ok(Self {
            runners: [first, second],
        })
    }

    pub fn send(&self, player: Player, cmd: Command) -> bool {
        self.runners[player.index()].send(cmd)
    }

    pub fn handle(&self, player: Player) -> &SessionHandle {
        self.runners[player.index()].handle()
    }

    pub fn snapshots(&self) -> [SessionSnapshot; 2] {
        [
            self.runners[0].handle().snapshot(),
            self.runners[1].handle().snapshot(),
        ]
    }

    pub fn stop(&mut self) {
        for runner in &mut self.runners {
            runner.stop();
        }
    }
}
