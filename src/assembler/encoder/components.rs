/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

/// `x z q p` opcode layout: `(x<<6) | (p<<4) | (q<<3) | z`.
pub fn asm_xzqp(x: u8, z: u8, q: u8, p: u8) -> u8 {
    (x << 6) | (p << 4) | (q << 3) | z
}

/// `x z y` opcode layout: `(x<<6) | (y<<3) | z`.
pub fn asm_xzy(x: u8, z: u8, y: u8) -> u8 {
    (x << 6) | (y << 3) | z
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xzqp_packs_fields() {
        // JP nn: x=3 z=3 q=0 p=0 -> 0xC3
        assert_eq!(asm_xzqp(3, 3, 0, 0), 0xC3);
        // CALL nn: x=3 z=5 q=1 p=0 -> 0xCD
        assert_eq!(asm_xzqp(3, 5, 1, 0), 0xCD);
    }

    #[test]
    fn xzy_packs_fields() {
        // RET: x=3 z=1 y=1 -> 0xC9
        assert_eq!(asm_xzy(3, 1, 1), 0xC9);
    }
}
