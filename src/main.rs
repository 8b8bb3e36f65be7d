fn main() {
    mirror_shift::game::run();
}
