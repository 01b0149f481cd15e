// This file is part of slash, a POSIX command language interpreter.
// Copyright (C) 2026 The slash developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use slash_env::semantics::ExitStatus;

fn main() -> ExitStatus {
    let args: Vec<String> = std::env::args().collect();
    let shell_name = args
        .first()
        .map(String::as_str)
        .unwrap_or("slash")
        .to_string();
    slash_cli::run(&shell_name, args.get(1..).unwrap_or(&[]))
}
