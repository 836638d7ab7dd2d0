fn main() {
	agent_map::start();
}
